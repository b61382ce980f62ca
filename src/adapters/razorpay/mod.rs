//! Payment gateway adapters.

mod client;
mod mock;

pub use client::RazorpayGateway;
pub use mock::MockPaymentGateway;
