use axum::{
    routing::{get, patch, post},
    Router,
};

use super::super::state::AppState;
use super::handlers::{list_leads, submit_lead, subscribe, unsubscribe, update_lead};

/// Routes mounted at `/api/marketing`.
pub fn marketing_routes() -> Router<AppState> {
    Router::new()
        .route("/leads", post(submit_lead))
        .route("/newsletter/subscribe", post(subscribe))
        .route("/newsletter/unsubscribe", post(unsubscribe))
        .route("/admin/leads", get(list_leads))
        .route("/admin/leads/:id", patch(update_lead))
}
