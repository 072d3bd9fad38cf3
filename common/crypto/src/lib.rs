use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::Rng;
use sha2::Sha256;
use std::ops::RangeInclusive;
use subtle::ConstantTimeEq;
use thiserror::Error;
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;

/// Errors produced by the common-crypto helpers.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("invalid HMAC key length")]
    InvalidMacKey,
    #[error("empty random range {start}..={end}")]
    EmptyRange { start: u32, end: u32 },
}

/// Shared secret used to key request signatures. Zeroized on drop.
#[derive(Clone)]
pub struct SharedSecret(Zeroizing<Vec<u8>>);

impl SharedSecret {
    pub fn new<B>(bytes: B) -> Self
    where
        B: AsRef<[u8]>,
    {
        Self(Zeroizing::new(bytes.as_ref().to_vec()))
    }

    /// Hex HMAC-SHA256 of `message` keyed with this secret.
    pub fn sign_hex(&self, message: &[u8]) -> Result<String, CryptoError> {
        hmac_sha256_hex(&self.0, message)
    }

    /// Recompute the signature of `message` and compare it with `provided_hex`
    /// in constant time. Hex case is ignored.
    pub fn verify_hex(&self, message: &[u8], provided_hex: &str) -> Result<bool, CryptoError> {
        let expected = self.sign_hex(message)?;
        let provided = provided_hex.trim().to_ascii_lowercase();
        Ok(expected.as_bytes().ct_eq(provided.as_bytes()).unwrap_u8() == 1)
    }
}

impl From<&str> for SharedSecret {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SharedSecret {
    fn from(value: String) -> Self {
        Self(Zeroizing::new(value.into_bytes()))
    }
}

impl std::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedSecret")
            .field("bytes", &"***redacted***")
            .finish()
    }
}

/// Produce a lowercase hex HMAC-SHA256 digest of `message`.
pub fn hmac_sha256_hex(key: &[u8], message: &[u8]) -> Result<String, CryptoError> {
    let mut mac =
        <HmacSha256 as Mac>::new_from_slice(key).map_err(|_| CryptoError::InvalidMacKey)?;
    mac.update(message);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Draw a uniformly distributed integer from `range` using the OS CSPRNG.
pub fn random_u32(range: RangeInclusive<u32>) -> Result<u32, CryptoError> {
    if range.is_empty() {
        return Err(CryptoError::EmptyRange {
            start: *range.start(),
            end: *range.end(),
        });
    }
    Ok(OsRng.gen_range(range))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hmac_matches_rfc4231_case_2() {
        let digest = hmac_sha256_hex(b"Jefe", b"what do ya want for nothing?").expect("sign");
        assert_eq!(
            digest,
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn signature_is_stable_per_key() {
        let secret = SharedSecret::from("s3cret");
        let a = secret.sign_hex(b"merchReference=-1-1").expect("sign");
        let b = secret.sign_hex(b"merchReference=-1-1").expect("sign");
        let c = SharedSecret::from("other").sign_hex(b"merchReference=-1-1").expect("sign");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn verify_accepts_uppercase_and_rejects_tampered() {
        let secret = SharedSecret::from("s3cret");
        let sig = secret.sign_hex(b"amount=10.5").expect("sign");
        assert!(secret.verify_hex(b"amount=10.5", &sig.to_uppercase()).expect("verify"));
        assert!(!secret.verify_hex(b"amount=105", &sig).expect("verify"));
        assert!(!secret.verify_hex(b"amount=10.5", "deadbeef").expect("verify"));
    }

    #[test]
    fn random_stays_in_range() {
        for _ in 0..1_000 {
            let n = random_u32(100_000..=999_999).expect("random");
            assert!((100_000..=999_999).contains(&n));
        }
        assert_eq!(random_u32(7..=7).expect("random"), 7);
    }

    #[test]
    #[allow(clippy::reversed_empty_ranges)]
    fn random_rejects_empty_range() {
        assert!(matches!(
            random_u32(10..=1),
            Err(CryptoError::EmptyRange { start: 10, end: 1 })
        ));
    }

    #[test]
    fn debug_is_redacted() {
        let secret = SharedSecret::from("hunter2");
        let rendered = format!("{secret:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("redacted"));
    }
}
