//! Razorpay webhook payloads.
//!
//! Only the fields needed to settle an order are captured; everything else in
//! the delivery is ignored.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct RazorpayEvent {
    /// Event name, e.g. `payment.captured`.
    pub event: String,
    #[serde(default)]
    pub payload: RazorpayPayload,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RazorpayPayload {
    pub payment: Option<PaymentWrapper>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentWrapper {
    pub entity: PaymentEntity,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentEntity {
    pub id: String,
    pub order_id: Option<String>,
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub status: String,
}

/// What a webhook asks us to do with an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    Captured { order_id: String, payment_id: String },
    Failed { order_id: String, payment_id: String },
    Ignored,
}

impl RazorpayEvent {
    pub fn outcome(&self) -> PaymentOutcome {
        let Some(payment) = self.payload.payment.as_ref().map(|p| &p.entity) else {
            return PaymentOutcome::Ignored;
        };
        let Some(order_id) = payment.order_id.clone() else {
            return PaymentOutcome::Ignored;
        };
        let payment_id = payment.id.clone();
        match self.event.as_str() {
            "payment.captured" | "order.paid" => PaymentOutcome::Captured { order_id, payment_id },
            "payment.failed" => PaymentOutcome::Failed { order_id, payment_id },
            _ => PaymentOutcome::Ignored,
        }
    }
}
