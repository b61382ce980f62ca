use axum::{
    routing::{get, post},
    Router,
};

use super::super::state::AppState;
use super::handlers::{
    archive, create_property, delete_property, get_property, mark_sold, my_properties,
    search_properties, update_property,
};

/// Routes mounted at `/api/properties`.
pub fn property_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(search_properties).post(create_property))
        .route("/mine", get(my_properties))
        .route(
            "/:id",
            get(get_property).put(update_property).delete(delete_property),
        )
        .route("/:id/sold", post(mark_sold))
        .route("/:id/archive", post(archive))
}
