//! Payment gateway port.
//!
//! Amounts cross this boundary in paise (1/100 rupee), the gateway's unit.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::subscription::SignatureError;

/// Order created at the gateway for the client checkout to complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GatewayOrder {
    pub order_id: String,
    pub amount_paise: i64,
    pub currency: String,
    /// Public key id the client checkout needs.
    pub key_id: String,
}

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("payment gateway not configured")]
    NotConfigured,

    #[error("payment gateway error: {0}")]
    Gateway(String),
}

impl From<PaymentError> for DomainError {
    fn from(err: PaymentError) -> Self {
        DomainError::new(ErrorCode::ExternalServiceError, err.to_string())
    }
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Creates an order. `receipt` is our own reference for reconciliation.
    async fn create_order(&self, amount_paise: i64, receipt: &str) -> Result<GatewayOrder, PaymentError>;

    /// Verifies a checkout callback signature over `order_id|payment_id`.
    fn verify_payment(&self, order_id: &str, payment_id: &str, signature: &str)
        -> Result<(), SignatureError>;

    /// Verifies a webhook body signature.
    fn verify_webhook(&self, body: &[u8], signature: &str) -> Result<(), SignatureError>;
}
