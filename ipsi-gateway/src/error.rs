use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use common_crypto::CryptoError;
use serde::Serialize;
use thiserror::Error;

pub type PaymentLinkResult<T> = Result<T, PaymentLinkError>;

#[derive(Debug, Error)]
pub enum PaymentLinkError {
    #[error("{0}")]
    InvalidArgument(String),
    #[error("failed to generate merchant reference: {0}")]
    Reference(CryptoError),
    /// HMAC-SHA256 accepts keys of any length, so this does not occur in practice.
    #[error("failed to sign payment link: {0}")]
    Signing(CryptoError),
}

impl PaymentLinkError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            PaymentLinkError::InvalidArgument(_) => "invalid_argument",
            PaymentLinkError::Reference(_) => "reference_failed",
            PaymentLinkError::Signing(_) => "signing_failed",
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl IntoResponse for PaymentLinkError {
    fn into_response(self) -> Response {
        let status = match &self {
            PaymentLinkError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            PaymentLinkError::Reference(_) | PaymentLinkError::Signing(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let code = self.code();
        let body = ErrorBody {
            code,
            message: self.to_string(),
        };
        let mut resp = (status, Json(body)).into_response();
        resp.headers_mut()
            .insert("X-Error-Code", HeaderValue::from_static(code));
        resp
    }
}
