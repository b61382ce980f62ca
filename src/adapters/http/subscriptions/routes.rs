use axum::{
    routing::{get, post},
    Router,
};

use super::super::state::AppState;
use super::handlers::{
    cancel_subscription, create_order, list_plans, my_entitlement, payment_webhook,
    verify_payment,
};

/// Routes mounted at `/api/subscriptions`.
///
/// `/plans` and `/webhook` are public; the webhook authenticates by signature.
pub fn subscription_routes() -> Router<AppState> {
    Router::new()
        .route("/plans", get(list_plans))
        .route("/me", get(my_entitlement))
        .route("/orders", post(create_order))
        .route("/verify", post(verify_payment))
        .route("/cancel", post(cancel_subscription))
        .route("/webhook", post(payment_webhook))
}
