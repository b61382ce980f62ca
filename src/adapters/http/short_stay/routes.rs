use axum::{
    routing::{get, post},
    Router,
};

use super::super::state::AppState;
use super::handlers::{
    cancel_reservation, complete_reservation, confirm_payment, create_listing, delete_listing,
    get_availability, get_listing, host_listings, host_reservations, my_reservations,
    quote_stay, reserve, search_listings, start_payment, update_listing,
};

/// Routes mounted at `/api/short-stay`.
pub fn short_stay_routes() -> Router<AppState> {
    Router::new()
        .route("/listings", get(search_listings).post(create_listing))
        .route(
            "/listings/:id",
            get(get_listing).put(update_listing).delete(delete_listing),
        )
        .route("/listings/:id/availability", get(get_availability))
        .route("/listings/:id/quote", get(quote_stay))
        .route("/host/listings", get(host_listings))
        .route("/host/reservations", get(host_reservations))
        .route("/reservations", post(reserve))
        .route("/reservations/mine", get(my_reservations))
        .route("/reservations/confirm-payment", post(confirm_payment))
        .route("/reservations/:id/pay", post(start_payment))
        .route("/reservations/:id/cancel", post(cancel_reservation))
        .route("/reservations/:id/complete", post(complete_reservation))
}
