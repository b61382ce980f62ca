//! Subscription domain module.
//!
//! Handles listing plans, subscription lifecycle and payment verification.
//!
//! # Module Structure
//!
//! - `plan` - Plan catalog and limits
//! - `status` - SubscriptionStatus state machine
//! - `aggregate` - Subscription aggregate and entitlement resolution
//! - `signature` - Gateway HMAC verification
//! - `webhook` - Gateway webhook payloads

mod aggregate;
mod plan;
mod signature;
mod status;
mod webhook;

pub use aggregate::{Entitlement, Subscription};
pub use plan::{Plan, PlanCode};
pub use signature::{
    hmac_sha256_hex, verify_payment_signature, verify_webhook_signature, SignatureError,
};
pub use status::SubscriptionStatus;
pub use webhook::{PaymentOutcome, RazorpayEvent};
