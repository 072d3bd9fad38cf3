use anyhow::{anyhow, Context, Result};
use common_crypto::{CryptoError, SharedSecret};
use std::env;

/// Merchant credentials and endpoint for the IPSI hosted payment page.
#[derive(Debug, Clone)]
pub struct IpsiConfig {
    pub username: String,
    pub config_id: String,
    pub shared_secret: SharedSecret,
    pub base_url: String,
}

impl IpsiConfig {
    pub fn new(
        username: impl Into<String>,
        config_id: impl Into<String>,
        shared_secret: impl Into<SharedSecret>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            config_id: config_id.into(),
            shared_secret: shared_secret.into(),
            base_url: base_url.into(),
        }
    }

    pub fn from_env() -> Result<Self> {
        let username = required("IPSI_USERNAME")?;
        let config_id = required("IPSI_CONFIG_ID")?;
        let shared_secret = required("IPSI_SHARED_SECRET")?;
        let base_url = required("IPSI_BASE_URL")?;
        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            return Err(anyhow!(
                "IPSI_BASE_URL must be an absolute http(s) URL, got '{base_url}'"
            ));
        }

        Ok(Self::new(username, config_id, shared_secret, base_url))
    }

    /// Base URL with every trailing slash removed.
    pub fn endpoint(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Check a `verifyMessage` digest against the query string it claims to sign.
    pub fn verify_query(&self, query: &str, verify_message: &str) -> Result<bool, CryptoError> {
        self.shared_secret.verify_hex(query.as_bytes(), verify_message)
    }
}

fn required(key: &str) -> Result<String> {
    let value = env::var(key).with_context(|| format!("{key} must be set"))?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("{key} must not be empty"));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_strips_trailing_slashes() {
        let cfg = IpsiConfig::new("merchant", "cfg-1", "secret", "https://pay.example.com/hpp///");
        assert_eq!(cfg.endpoint(), "https://pay.example.com/hpp");
        let cfg = IpsiConfig::new("merchant", "cfg-1", "secret", "https://pay.example.com/hpp");
        assert_eq!(cfg.endpoint(), "https://pay.example.com/hpp");
    }

    #[test]
    fn debug_redacts_secret() {
        let cfg = IpsiConfig::new("merchant", "cfg-1", "topsecret", "https://pay.example.com");
        let rendered = format!("{cfg:?}");
        assert!(rendered.contains("merchant"));
        assert!(!rendered.contains("topsecret"));
    }

    // Single test touches the process environment so parallel tests cannot race on it.
    #[test]
    fn from_env_reads_and_validates() {
        std::env::set_var("IPSI_USERNAME", " merchant ");
        std::env::set_var("IPSI_CONFIG_ID", "cfg-9");
        std::env::set_var("IPSI_SHARED_SECRET", "s3cret");
        std::env::set_var("IPSI_BASE_URL", "https://pay.example.com/");
        let cfg = IpsiConfig::from_env().expect("config");
        assert_eq!(cfg.username, "merchant");
        assert_eq!(cfg.config_id, "cfg-9");
        assert_eq!(cfg.endpoint(), "https://pay.example.com");

        std::env::set_var("IPSI_BASE_URL", "pay.example.com");
        let err = IpsiConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("absolute"), "{err}");

        std::env::set_var("IPSI_BASE_URL", "https://pay.example.com/");
        std::env::set_var("IPSI_SHARED_SECRET", "   ");
        let err = IpsiConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("IPSI_SHARED_SECRET"), "{err}");

        std::env::remove_var("IPSI_SHARED_SECRET");
        let err = IpsiConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("must be set"), "{err}");
    }
}
