//! Signed redirect links for the IPSI hosted payment page.
//!
//! The builder collects the request by value and validates once in
//! [`PaymentLinkBuilder::finalize`]. Signing encodes the parameters in a fixed
//! order, computes HMAC-SHA256 over that exact query string, and appends the
//! digest as `verifyMessage`.

use crate::config::IpsiConfig;
use crate::error::{PaymentLinkError, PaymentLinkResult};
use crate::identity::Identified;
use crate::reference::{sanitize_brand, MerchantReference};
use common_money::MinorUnits;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Transaction type sent with every link (purchase).
pub const TXN_TYPE_PURCHASE: &str = "0";

pub const VERIFY_MESSAGE_PARAM: &str = "verifyMessage";

#[derive(Debug, Clone)]
pub struct PaymentLinkBuilder {
    config: Arc<IpsiConfig>,
    amount: Option<MinorUnits>,
    user_id: Option<String>,
    token: Option<String>,
    brand: Option<String>,
}

impl PaymentLinkBuilder {
    pub fn new(config: Arc<IpsiConfig>) -> Self {
        Self {
            config,
            amount: None,
            user_id: None,
            token: None,
            brand: None,
        }
    }

    /// Amount in cents; must be strictly positive.
    pub fn amount(mut self, cents: i64) -> PaymentLinkResult<Self> {
        let amount = MinorUnits::new(cents).map_err(|_| {
            PaymentLinkError::invalid("Amount must be a positive integer in cents.")
        })?;
        self.amount = Some(amount);
        Ok(self)
    }

    pub fn user<U: Identified>(mut self, user: U) -> PaymentLinkResult<Self> {
        let id = user
            .identity()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| PaymentLinkError::invalid("User must expose a non-empty `id`."))?;
        self.user_id = Some(id);
        Ok(self)
    }

    /// Saved-card token. Without one the gateway is asked to tokenize the card.
    /// `""` and `"0"` count as no token.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn brand(mut self, brand: &str) -> Self {
        self.brand = Some(sanitize_brand(brand));
        self
    }

    pub fn finalize(self) -> PaymentLinkResult<PaymentRequest> {
        let user_id = self.user_id.ok_or_else(|| {
            PaymentLinkError::invalid("User must be set before generating URL.")
        })?;
        let amount = self.amount.ok_or_else(|| {
            PaymentLinkError::invalid("Amount must be set before generating URL.")
        })?;
        Ok(PaymentRequest {
            config: self.config,
            amount,
            user_id,
            token: self.token.filter(|t| !is_unset_token(t)),
            brand: self.brand,
        })
    }

    pub fn build(self) -> PaymentLinkResult<PaymentLink> {
        self.finalize()?.sign()
    }
}

/// A fully validated link request.
#[derive(Debug, Clone)]
pub struct PaymentRequest {
    config: Arc<IpsiConfig>,
    amount: MinorUnits,
    user_id: String,
    token: Option<String>,
    brand: Option<String>,
}

impl PaymentRequest {
    pub fn amount(&self) -> MinorUnits {
        self.amount
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn brand(&self) -> Option<&str> {
        self.brand.as_deref()
    }

    /// Sign with a freshly generated merchant reference.
    pub fn sign(self) -> PaymentLinkResult<PaymentLink> {
        let reference = MerchantReference::generate(self.brand.as_deref(), &self.user_id)?;
        self.sign_with_reference(reference)
    }

    /// Sign with a caller-supplied merchant reference.
    pub fn sign_with_reference(self, reference: MerchantReference) -> PaymentLinkResult<PaymentLink> {
        let merch_reference = reference.to_string();
        let query = encode(&self.params(&merch_reference))?;
        let verify_message = self
            .config
            .shared_secret
            .sign_hex(query.as_bytes())
            .map_err(PaymentLinkError::Signing)?;
        let signature = encode(&[(VERIFY_MESSAGE_PARAM, verify_message.clone())])?;

        let endpoint = self.config.endpoint();
        let url = format!("{endpoint}?{query}&{signature}");

        debug!(
            merch_reference = %merch_reference,
            saved_card = self.token.is_some(),
            "built IPSI payment link"
        );

        Ok(PaymentLink {
            query_start: endpoint.len() + 1,
            query_end: endpoint.len() + 1 + query.len(),
            url,
            merch_reference,
            verify_message,
        })
    }

    /// Ordered gateway parameters, before encoding.
    pub fn params(&self, merch_reference: &str) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("merchReference", merch_reference.to_string()),
            ("userName", self.config.username.clone()),
            ("configId", self.config.config_id.clone()),
            ("txnType", TXN_TYPE_PURCHASE.to_string()),
            ("amount", self.amount.to_major().to_string()),
        ];
        match &self.token {
            Some(token) => params.push(("cardToken", token.clone())),
            None => params.push(("tokenControl.token", "true".to_string())),
        }
        params
    }
}

fn is_unset_token(token: &str) -> bool {
    token.is_empty() || token == "0"
}

fn encode(params: &[(&'static str, String)]) -> PaymentLinkResult<String> {
    serde_urlencoded::to_string(params)
        .map_err(|err| PaymentLinkError::invalid(format!("unencodable link parameter: {err}")))
}

/// A signed redirect URL and the merchant reference it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentLink {
    url: String,
    query_start: usize,
    query_end: usize,
    merch_reference: String,
    verify_message: String,
}

impl PaymentLink {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn into_url(self) -> String {
        self.url
    }

    pub fn merch_reference(&self) -> &str {
        &self.merch_reference
    }

    /// The exact query string covered by the signature.
    pub fn query(&self) -> &str {
        &self.url[self.query_start..self.query_end]
    }

    /// Lowercase hex HMAC-SHA256 of [`PaymentLink::query`].
    pub fn verify_message(&self) -> &str {
        &self.verify_message
    }
}

impl fmt::Display for PaymentLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}
