use axum::{
    routing::{get, patch, post},
    Router,
};

use super::super::state::AppState;
use super::handlers::{create_review, delete_review, list_property_reviews, update_review};

/// Routes mounted at `/api/reviews`.
pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_review))
        .route("/property/:id", get(list_property_reviews))
        .route("/:id", patch(update_review).delete(delete_review))
}
