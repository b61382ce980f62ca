//! Razorpay signature verification.
//!
//! Two signatures arrive from the gateway:
//!
//! - the checkout callback signs `order_id|payment_id` with the key secret
//! - webhooks sign the raw request body with the webhook secret
//!
//! Both are lowercase hex HMAC-SHA256 and are compared in constant time.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("Signature is missing")]
    Missing,
    #[error("Signature is not valid hex")]
    Malformed,
    #[error("Signature does not match")]
    Mismatch,
    #[error("Signing key rejected: {0}")]
    Key(String),
}

impl From<SignatureError> for DomainError {
    fn from(err: SignatureError) -> Self {
        match err {
            SignatureError::Key(msg) => DomainError::new(ErrorCode::InternalError, msg),
            other => DomainError::new(ErrorCode::PaymentVerificationFailed, other.to_string()),
        }
    }
}

/// Lowercase hex HMAC-SHA256 of `message`.
pub fn hmac_sha256_hex(secret: &str, message: &[u8]) -> Result<String, SignatureError> {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .map_err(|e| SignatureError::Key(e.to_string()))?;
    mac.update(message);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

fn verify(secret: &str, message: &[u8], signature: &str) -> Result<(), SignatureError> {
    let signature = signature.trim();
    if signature.is_empty() {
        return Err(SignatureError::Missing);
    }
    let provided = hex::decode(signature).map_err(|_| SignatureError::Malformed)?;
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .map_err(|e| SignatureError::Key(e.to_string()))?;
    mac.update(message);
    let expected = mac.finalize().into_bytes();
    if expected.len() == provided.len() && bool::from(expected.as_slice().ct_eq(&provided)) {
        Ok(())
    } else {
        Err(SignatureError::Mismatch)
    }
}

/// Checks the checkout callback signature.
pub fn verify_payment_signature(
    key_secret: &str,
    order_id: &str,
    payment_id: &str,
    signature: &str,
) -> Result<(), SignatureError> {
    let message = format!("{}|{}", order_id, payment_id);
    verify(key_secret, message.as_bytes(), signature)
}

/// Checks the `X-Razorpay-Signature` header of a webhook delivery.
pub fn verify_webhook_signature(
    webhook_secret: &str,
    body: &[u8],
    signature: &str,
) -> Result<(), SignatureError> {
    verify(webhook_secret, body, signature)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "rzp_test_secret";

    #[test]
    fn valid_payment_signature_passes() {
        let sig = hmac_sha256_hex(SECRET, b"order_1|pay_1").unwrap();
        assert!(verify_payment_signature(SECRET, "order_1", "pay_1", &sig).is_ok());
    }

    #[test]
    fn swapped_ids_fail() {
        let sig = hmac_sha256_hex(SECRET, b"order_1|pay_1").unwrap();
        assert_eq!(
            verify_payment_signature(SECRET, "pay_1", "order_1", &sig),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn wrong_secret_fails() {
        let sig = hmac_sha256_hex("other", b"order_1|pay_1").unwrap();
        assert!(verify_payment_signature(SECRET, "order_1", "pay_1", &sig).is_err());
    }

    #[test]
    fn non_hex_signature_is_malformed() {
        assert_eq!(
            verify_webhook_signature(SECRET, b"{}", "zz-not-hex"),
            Err(SignatureError::Malformed)
        );
        assert_eq!(verify_webhook_signature(SECRET, b"{}", " "), Err(SignatureError::Missing));
    }

    #[test]
    fn webhook_body_signature_passes() {
        let body = br#"{"event":"payment.captured"}"#;
        let sig = hmac_sha256_hex(SECRET, body).unwrap();
        assert!(verify_webhook_signature(SECRET, body, &sig).is_ok());
    }

    #[test]
    fn mismatch_maps_to_payment_verification_failed() {
        let err: DomainError = SignatureError::Mismatch.into();
        assert_eq!(err.code, ErrorCode::PaymentVerificationFailed);
    }
}
