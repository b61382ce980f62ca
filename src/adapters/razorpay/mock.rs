//! Mock payment gateway for development and tests.
//!
//! Orders get sequential ids. Signatures are accepted when they equal
//! `MockPaymentGateway::SIGNATURE`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::subscription::SignatureError;
use crate::ports::{GatewayOrder, PaymentError, PaymentGateway};

#[derive(Debug, Default)]
pub struct MockPaymentGateway {
    next_id: AtomicU64,
    orders: Mutex<Vec<GatewayOrder>>,
    fail_orders: bool,
}

impl MockPaymentGateway {
    pub const SIGNATURE: &'static str = "mock_signature";

    pub fn new() -> Self {
        Self::default()
    }

    /// A gateway whose order creation always fails.
    pub fn failing() -> Self {
        Self {
            fail_orders: true,
            ..Self::default()
        }
    }

    pub fn orders(&self) -> Vec<GatewayOrder> {
        self.orders.lock().map(|o| o.clone()).unwrap_or_default()
    }

    fn check(signature: &str) -> Result<(), SignatureError> {
        match signature {
            "" => Err(SignatureError::Missing),
            Self::SIGNATURE => Ok(()),
            _ => Err(SignatureError::Mismatch),
        }
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_order(&self, amount_paise: i64, _receipt: &str) -> Result<GatewayOrder, PaymentError> {
        if self.fail_orders {
            return Err(PaymentError::Gateway("mock gateway set to fail".to_string()));
        }
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let order = GatewayOrder {
            order_id: format!("order_mock_{}", n),
            amount_paise,
            currency: "INR".to_string(),
            key_id: "rzp_test_mock".to_string(),
        };
        if let Ok(mut orders) = self.orders.lock() {
            orders.push(order.clone());
        }
        Ok(order)
    }

    fn verify_payment(&self, _order_id: &str, _payment_id: &str, signature: &str) -> Result<(), SignatureError> {
        Self::check(signature)
    }

    fn verify_webhook(&self, _body: &[u8], signature: &str) -> Result<(), SignatureError> {
        Self::check(signature)
    }
}
