use crate::error::{PaymentLinkError, PaymentLinkResult};
use common_crypto::random_u32;
use std::fmt;
use std::ops::RangeInclusive;

/// Six-digit window for the random part of a merchant reference.
pub const REFERENCE_DIGITS: RangeInclusive<u32> = 100_000..=999_999;

/// Uppercase `brand` and keep only ASCII letters and digits.
pub fn sanitize_brand(brand: &str) -> String {
    brand
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// `{BRAND}-{NNNNNN}-{userId}` correlation id sent as `merchReference`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerchantReference {
    brand: String,
    nonce: u32,
    user_id: String,
}

impl MerchantReference {
    pub fn generate(brand: Option<&str>, user_id: &str) -> PaymentLinkResult<Self> {
        Self::generate_in(REFERENCE_DIGITS, brand, user_id)
    }

    fn generate_in(
        digits: RangeInclusive<u32>,
        brand: Option<&str>,
        user_id: &str,
    ) -> PaymentLinkResult<Self> {
        let nonce = random_u32(digits).map_err(PaymentLinkError::Reference)?;
        Ok(Self::with_nonce(brand, nonce, user_id))
    }

    pub fn with_nonce(brand: Option<&str>, nonce: u32, user_id: &str) -> Self {
        Self {
            brand: brand.map(sanitize_brand).unwrap_or_default(),
            nonce,
            user_id: user_id.to_string(),
        }
    }

    pub fn nonce(&self) -> u32 {
        self.nonce
    }
}

impl fmt::Display for MerchantReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.brand, self.nonce, self.user_id)
    }
}
