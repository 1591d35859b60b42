//! GitHub webhook signature verification.
//!
//! GitHub signs each delivery with HMAC-SHA256 over the raw request body,
//! keyed by the webhook secret, and sends it as
//! `X-Hub-Signature-256: sha256=<hex digest>`.
//! Reference: https://docs.github.com/en/webhooks/using-webhooks/validating-webhook-deliveries

use hmac::digest::InvalidLength;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the delivery signature.
pub const SIGNATURE_HEADER: &str = "X-Hub-Signature-256";

/// Scheme label prefixed to the hex digest.
pub const SIGNATURE_PREFIX: &str = "sha256=";

/// Compute the signature GitHub would send for `body`: `sha256=<hex>`.
pub fn sign_payload(secret: &str, body: &[u8]) -> Result<String, InvalidLength> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())?;
    mac.update(body);
    Ok(format!(
        "{}{}",
        SIGNATURE_PREFIX,
        hex::encode(mac.finalize().into_bytes())
    ))
}

/// Verify a GitHub webhook signature header against the raw body.
///
/// The full header value, prefix included, is compared in constant time.
pub fn verify_github_signature(secret: &str, body: &[u8], signature: &str) -> bool {
    if secret.is_empty() || signature.is_empty() {
        warn!(
            has_secret = !secret.is_empty(),
            has_signature = !signature.is_empty(),
            "webhook_signature_missing_fields"
        );
        return false;
    }

    let expected_signature = match sign_payload(secret, body) {
        Ok(s) => s,
        Err(_) => {
            warn!("webhook_signature_invalid_key");
            return false;
        }
    };

    let valid: bool = expected_signature
        .as_bytes()
        .ct_eq(signature.as_bytes())
        .into();

    if !valid {
        warn!(
            expected_length = expected_signature.len(),
            actual_length = signature.len(),
            has_prefix = signature.starts_with(SIGNATURE_PREFIX),
            "webhook_signature_mismatch"
        );
    }

    valid
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "It's a Secret to Everybody";
    const BODY: &[u8] = b"Hello, World!";

    #[test]
    fn test_sign_payload_known_vector() {
        // Example from GitHub's webhook validation docs
        assert_eq!(
            sign_payload(SECRET, BODY).unwrap(),
            "sha256=757107ea0eb2509fc211221cce984b8a37570b6d7586c22c46f4379c8b043e17"
        );
    }

    #[test]
    fn test_verify_signature_valid() {
        let signature = sign_payload(SECRET, BODY).unwrap();
        assert!(verify_github_signature(SECRET, BODY, &signature));
    }

    #[test]
    fn test_verify_signature_missing_fields() {
        let signature = sign_payload(SECRET, BODY).unwrap();
        assert!(!verify_github_signature("", BODY, &signature));
        assert!(!verify_github_signature(SECRET, BODY, ""));
    }

    #[test]
    fn test_verify_signature_wrong_secret() {
        let signature = sign_payload("another-secret", BODY).unwrap();
        assert!(!verify_github_signature(SECRET, BODY, &signature));
    }

    #[test]
    fn test_verify_signature_requires_prefix() {
        let signature = sign_payload(SECRET, BODY).unwrap();
        let bare = signature.trim_start_matches(SIGNATURE_PREFIX);
        assert!(!verify_github_signature(SECRET, BODY, bare));
        assert!(!verify_github_signature(
            SECRET,
            BODY,
            &format!("sha1={}", bare)
        ));
    }

    #[test]
    fn test_verify_signature_any_body_byte_mutation_rejected() {
        let signature = sign_payload(SECRET, BODY).unwrap();
        for i in 0..BODY.len() {
            let mut mutated = BODY.to_vec();
            mutated[i] ^= 0x01;
            assert!(
                !verify_github_signature(SECRET, &mutated, &signature),
                "mutation at body byte {} was accepted",
                i
            );
        }
    }

    #[test]
    fn test_verify_signature_any_signature_byte_mutation_rejected() {
        let signature = sign_payload(SECRET, BODY).unwrap();
        for i in 0..signature.len() {
            let mut mutated = signature.clone().into_bytes();
            mutated[i] ^= 0x01;
            let mutated = String::from_utf8(mutated).unwrap();
            assert!(
                !verify_github_signature(SECRET, BODY, &mutated),
                "mutation at signature byte {} was accepted",
                i
            );
        }
    }

    #[test]
    fn test_verify_signature_length_mismatch() {
        let signature = sign_payload(SECRET, BODY).unwrap();
        assert!(!verify_github_signature(
            SECRET,
            BODY,
            &signature[..signature.len() - 1]
        ));
        assert!(!verify_github_signature(
            SECRET,
            BODY,
            &format!("{}0", signature)
        ));
    }

    #[test]
    fn test_verify_signature_empty_body() {
        let signature = sign_payload(SECRET, b"").unwrap();
        assert!(verify_github_signature(SECRET, b"", &signature));
        assert!(!verify_github_signature(SECRET, b" ", &signature));
    }
}
