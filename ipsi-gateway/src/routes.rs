use crate::confirmation::Confirmation;
use crate::error::PaymentLinkError;
use crate::identity::Identified;
use crate::link::PaymentLinkBuilder;
use crate::AppState;
use axum::{
    extract::{RawQuery, State},
    http::{header::CONTENT_TYPE, HeaderMap},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkRequest {
    pub amount_cents: i64,
    pub user_id: Value,
    pub token: Option<String>,
    pub brand: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkResponse {
    pub url: String,
    pub merch_reference: String,
}

/// Bare ids arrive as JSON strings or numbers rather than objects.
struct JsonId(Value);

impl Identified for JsonId {
    fn identity(&self) -> Option<String> {
        match &self.0 {
            Value::String(id) => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            other => other.identity(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .route("/payments/ipsi/link", post(create_link))
        .route("/payments/ipsi/return", get(payment_return))
        .route("/payments/ipsi/notify", post(payment_notify))
        .with_state(state)
}

pub async fn create_link(
    State(state): State<AppState>,
    Json(req): Json<CreateLinkRequest>,
) -> Result<Json<CreateLinkResponse>, PaymentLinkError> {
    let mut builder = PaymentLinkBuilder::new(state.config.clone())
        .amount(req.amount_cents)?
        .user(JsonId(req.user_id))?;
    if let Some(token) = req.token {
        builder = builder.token(token);
    }
    if let Some(brand) = req.brand.as_deref() {
        builder = builder.brand(brand);
    }
    let link = builder.build()?;
    Ok(Json(CreateLinkResponse {
        merch_reference: link.merch_reference().to_string(),
        url: link.into_url(),
    }))
}

pub async fn payment_return(RawQuery(query): RawQuery) -> Json<Confirmation> {
    Json(Confirmation::from_query(query.as_deref().unwrap_or_default()))
}

pub async fn payment_notify(headers: HeaderMap, body: String) -> Json<Confirmation> {
    let is_json = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.trim_start().to_ascii_lowercase().starts_with("application/json"))
        .unwrap_or(false);
    if is_json {
        let payload = serde_json::from_str::<Value>(&body).unwrap_or(Value::Null);
        return Json(Confirmation::from_json(&payload));
    }
    Json(Confirmation::from_query(&body))
}
