use axum::{
    routing::{get, post},
    Router,
};

use super::super::state::AppState;
use super::handlers::{add_to_wishlist, list_wishlist, remove_from_wishlist, wishlist_ids};

/// Routes mounted at `/api/wishlists`.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_wishlist))
        .route("/ids", get(wishlist_ids))
        .route(
            "/:property_id",
            post(add_to_wishlist).delete(remove_from_wishlist),
        )
}
