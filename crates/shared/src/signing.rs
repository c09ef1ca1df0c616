//! Cookie and token signing using HMAC-SHA256.
//!
//! Sealed values have the form `base64url(payload).hex(mac)`. The payload is
//! opaque to this module; callers decide what goes inside (session JSON, a
//! remember-me user id). Verification is constant-time via the `hmac` crate.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Error type for seal/unseal operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SigningError {
    #[error("Malformed sealed value")]
    Malformed,

    #[error("Signature mismatch")]
    BadSignature,
}

fn mac(secret: &str, data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// Seals a payload into a tamper-evident string keyed by `secret`.
pub fn seal(secret: &str, payload: &[u8]) -> String {
    let encoded = URL_SAFE_NO_PAD.encode(payload);
    let tag = mac(secret, encoded.as_bytes());
    format!("{}.{}", encoded, hex::encode(tag))
}

/// Unseals a value produced by [`seal`], returning the original payload.
pub fn unseal(secret: &str, sealed: &str) -> Result<Vec<u8>, SigningError> {
    let (encoded, tag_hex) = sealed.rsplit_once('.').ok_or(SigningError::Malformed)?;
    let tag = hex::decode(tag_hex).map_err(|_| SigningError::Malformed)?;

    let mut verifier = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    verifier.update(encoded.as_bytes());
    verifier
        .verify_slice(&tag)
        .map_err(|_| SigningError::BadSignature)?;

    URL_SAFE_NO_PAD
        .decode(encoded)
        .map_err(|_| SigningError::Malformed)
}

/// Generates a random URL-safe token of `bytes` entropy bytes.
pub fn random_token(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rand::thread_rng().fill_bytes(&mut buf);
    URL_SAFE_NO_PAD.encode(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seal_unseal_round_trip() {
        let sealed = seal("secret", b"payload");
        assert_eq!(unseal("secret", &sealed).unwrap(), b"payload");
    }

    #[test]
    fn test_unseal_wrong_secret() {
        let sealed = seal("secret", b"payload");
        assert_eq!(
            unseal("other-secret", &sealed),
            Err(SigningError::BadSignature)
        );
    }

    #[test]
    fn test_unseal_tampered_payload() {
        let sealed = seal("secret", b"payload");
        let tag = sealed.rsplit_once('.').unwrap().1;
        let forged = format!("{}.{}", URL_SAFE_NO_PAD.encode(b"other"), tag);
        assert_eq!(unseal("secret", &forged), Err(SigningError::BadSignature));
    }

    #[test]
    fn test_unseal_missing_separator() {
        assert_eq!(unseal("secret", "no-dot-here"), Err(SigningError::Malformed));
    }

    #[test]
    fn test_unseal_garbage_tag() {
        assert_eq!(
            unseal("secret", "cGF5bG9hZA.not-hex"),
            Err(SigningError::Malformed)
        );
    }

    #[test]
    fn test_seal_empty_payload() {
        let sealed = seal("secret", b"");
        assert_eq!(unseal("secret", &sealed).unwrap(), b"");
    }

    #[test]
    fn test_seal_binary_payload() {
        let payload = [0u8, 255, 128, 7];
        let sealed = seal("secret", &payload);
        assert_eq!(unseal("secret", &sealed).unwrap(), payload);
    }

    #[test]
    fn test_seal_deterministic_for_same_input() {
        assert_eq!(seal("secret", b"x"), seal("secret", b"x"));
    }

    #[test]
    fn test_random_token_length_and_uniqueness() {
        let a = random_token(32);
        let b = random_token(32);
        assert_ne!(a, b);
        // 32 bytes in unpadded base64url
        assert_eq!(a.len(), 43);
    }
}
