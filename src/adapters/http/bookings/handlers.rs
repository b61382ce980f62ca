//! HTTP handlers for `/api/bookings`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::application::handlers::booking::{
    BookingAction, GetBookingQuery, RequestVisitCommand, UpdateBookingStatusCommand,
};
use crate::domain::foundation::{BookingId, PageQuery};

use super::super::error::{ApiError, ApiJson};
use super::super::middleware::RequireAuth;
use super::super::state::AppState;
use super::dto::{BookingResponse, CreateBookingRequest};

/// POST /api/bookings
pub async fn create_booking(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(req): ApiJson<CreateBookingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = RequestVisitCommand {
        visitor_id: user.id,
        property_id: req.property_id,
        visit_date: req.visit_date,
        time_slot: req.time_slot,
        contact_phone: req.contact_phone,
        message: req.message,
    };
    let booking = state.request_visit_handler().handle(cmd).await?;
    Ok((StatusCode::CREATED, Json(BookingResponse::from(booking))))
}

/// GET /api/bookings/mine - visits the caller requested
pub async fn my_bookings(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state.repos.bookings.list_for_visitor(&user.id, page.into()).await?;
    Ok(Json(page.map(BookingResponse::from)))
}

/// GET /api/bookings/incoming - visits to the caller's listings
pub async fn incoming_bookings(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state.repos.bookings.list_for_owner(&user.id, page.into()).await?;
    Ok(Json(page.map(BookingResponse::from)))
}

/// GET /api/bookings/:id
pub async fn get_booking(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(booking_id): Path<BookingId>,
) -> Result<impl IntoResponse, ApiError> {
    let booking = state
        .get_booking_handler()
        .handle(GetBookingQuery {
            viewer: user,
            booking_id,
        })
        .await?;
    Ok(Json(BookingResponse::from(booking)))
}

async fn apply(
    state: AppState,
    user: crate::domain::foundation::AuthenticatedUser,
    booking_id: BookingId,
    action: BookingAction,
) -> Result<Json<BookingResponse>, ApiError> {
    let booking = state
        .update_booking_status_handler()
        .handle(UpdateBookingStatusCommand {
            actor_id: user.id,
            booking_id,
            action,
        })
        .await?;
    Ok(Json(BookingResponse::from(booking)))
}

/// POST /api/bookings/:id/confirm - owner
pub async fn confirm_booking(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(booking_id): Path<BookingId>,
) -> Result<impl IntoResponse, ApiError> {
    apply(state, user, booking_id, BookingAction::Confirm).await
}

/// POST /api/bookings/:id/reject - owner
pub async fn reject_booking(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(booking_id): Path<BookingId>,
) -> Result<impl IntoResponse, ApiError> {
    apply(state, user, booking_id, BookingAction::Reject).await
}

/// POST /api/bookings/:id/complete - owner
pub async fn complete_booking(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(booking_id): Path<BookingId>,
) -> Result<impl IntoResponse, ApiError> {
    apply(state, user, booking_id, BookingAction::Complete).await
}

/// POST /api/bookings/:id/cancel - visitor or owner
pub async fn cancel_booking(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(booking_id): Path<BookingId>,
) -> Result<impl IntoResponse, ApiError> {
    apply(state, user, booking_id, BookingAction::Cancel).await
}
