use axum::{
    routing::{get, post},
    Router,
};

use super::super::state::AppState;
use super::handlers::{
    cancel_booking, complete_booking, confirm_booking, create_booking, get_booking,
    incoming_bookings, my_bookings, reject_booking,
};

/// Routes mounted at `/api/bookings`. All require authentication.
pub fn booking_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_booking))
        .route("/mine", get(my_bookings))
        .route("/incoming", get(incoming_bookings))
        .route("/:id", get(get_booking))
        .route("/:id/confirm", post(confirm_booking))
        .route("/:id/reject", post(reject_booking))
        .route("/:id/complete", post(complete_booking))
        .route("/:id/cancel", post(cancel_booking))
}
