//! HTTP DTOs for subscriptions.

use serde::{Deserialize, Serialize};

use crate::application::handlers::subscription::WebhookOutcome;
use crate::domain::subscription::PlanCode;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderRequest {
    pub plan: PlanCode,
}

/// Checkout callback fields as posted by the payment widget.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyPaymentRequest {
    #[serde(alias = "razorpay_order_id")]
    pub order_id: String,
    #[serde(alias = "razorpay_payment_id")]
    pub payment_id: String,
    #[serde(alias = "razorpay_signature")]
    pub signature: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct WebhookResponse {
    pub received: bool,
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl From<WebhookOutcome> for WebhookResponse {
    fn from(outcome: WebhookOutcome) -> Self {
        let (outcome, reference) = match outcome {
            WebhookOutcome::SubscriptionActivated(id) => {
                ("subscription_activated", Some(id.to_string()))
            }
            WebhookOutcome::SubscriptionFailed(id) => ("subscription_failed", Some(id.to_string())),
            WebhookOutcome::ReservationConfirmed(id) => {
                ("reservation_confirmed", Some(id.to_string()))
            }
            WebhookOutcome::Ignored => ("ignored", None),
        };
        Self {
            received: true,
            outcome,
            reference,
        }
    }
}
