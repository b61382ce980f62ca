use axum::{routing::get, Router};

use super::super::state::AppState;
use super::handlers::{health, readiness};

/// Routes mounted at `/health`.
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(health))
        .route("/ready", get(readiness))
}
