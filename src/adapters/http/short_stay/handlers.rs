//! HTTP handlers for `/api/short-stay`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::application::handlers::short_stay::{
    CancelReservationCommand, CompleteReservationCommand, ConfirmStayPaymentCommand,
    CreateStayListingCommand, DeleteStayListingCommand, GetAvailabilityQuery,
    GetStayListingQuery, QuoteStayQuery, ReserveStayCommand, StartStayPaymentCommand,
    UpdateStayListingCommand,
};
use crate::domain::foundation::{ListingId, ReservationId, Timestamp};

use super::super::error::{ApiError, ApiJson};
use super::super::middleware::{OptionalAuth, RequireAuth};
use super::super::state::AppState;
use super::dto::{
    AvailabilityParams, ConfirmPaymentRequest, QuoteParams, ReservationResponse, ReserveRequest,
    StayListingRequest, StayListingResponse, StaySearchParams,
};

// ════════════════════════════════════════════════════════════════════════════════
// Listings
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/short-stay/listings - active listings, optionally free for given dates
pub async fn search_listings(
    State(state): State<AppState>,
    Query(params): Query<StaySearchParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (search, page) = params.into_parts()?;
    let result = state
        .repos
        .listings
        .search(&search, Timestamp::now(), page)
        .await?;
    Ok(Json(result.map(StayListingResponse::from)))
}

/// GET /api/short-stay/listings/:id
pub async fn get_listing(
    State(state): State<AppState>,
    OptionalAuth(viewer): OptionalAuth,
    Path(listing_id): Path<ListingId>,
) -> Result<impl IntoResponse, ApiError> {
    let listing = state
        .get_stay_listing_handler()
        .handle(GetStayListingQuery { listing_id, viewer })
        .await?;
    Ok(Json(StayListingResponse::from(listing)))
}

/// GET /api/short-stay/listings/:id/availability?from=&to=
pub async fn get_availability(
    State(state): State<AppState>,
    Path(listing_id): Path<ListingId>,
    Query(params): Query<AvailabilityParams>,
) -> Result<impl IntoResponse, ApiError> {
    let availability = state
        .availability_handler()
        .handle(GetAvailabilityQuery {
            listing_id,
            from: params.from,
            to: params.to,
        })
        .await?;
    Ok(Json(availability))
}

/// GET /api/short-stay/listings/:id/quote?check_in=&check_out=&guests=
pub async fn quote_stay(
    State(state): State<AppState>,
    Path(listing_id): Path<ListingId>,
    Query(params): Query<QuoteParams>,
) -> Result<impl IntoResponse, ApiError> {
    let quote = state
        .quote_stay_handler()
        .handle(QuoteStayQuery {
            listing_id,
            check_in: params.check_in,
            check_out: params.check_out,
            guests: params.guests,
        })
        .await?;
    Ok(Json(quote))
}

/// POST /api/short-stay/listings
pub async fn create_listing(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(req): ApiJson<StayListingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (input, _) = req.into_parts();
    let listing = state
        .create_stay_listing_handler()
        .handle(CreateStayListingCommand {
            host_id: user.id,
            input,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(StayListingResponse::from(listing))))
}

/// PUT /api/short-stay/listings/:id - host
pub async fn update_listing(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(listing_id): Path<ListingId>,
    ApiJson(req): ApiJson<StayListingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (input, status) = req.into_parts();
    let listing = state
        .update_stay_listing_handler()
        .handle(UpdateStayListingCommand {
            actor: user,
            listing_id,
            input,
            status,
        })
        .await?;
    Ok(Json(StayListingResponse::from(listing)))
}

/// DELETE /api/short-stay/listings/:id - host or admin
pub async fn delete_listing(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(listing_id): Path<ListingId>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .delete_stay_listing_handler()
        .handle(DeleteStayListingCommand {
            actor: user,
            listing_id,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/short-stay/host/listings - the caller's listings in every status
pub async fn host_listings(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let listings = state.repos.listings.list_by_host(&user.id).await?;
    let body: Vec<StayListingResponse> = listings.into_iter().map(Into::into).collect();
    Ok(Json(body))
}

// ════════════════════════════════════════════════════════════════════════════════
// Reservations
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/short-stay/reservations - pending hold on the dates
pub async fn reserve(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(req): ApiJson<ReserveRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let reservation = state
        .reserve_stay_handler()
        .handle(ReserveStayCommand {
            guest_id: user.id,
            listing_id: req.listing_id,
            check_in: req.check_in,
            check_out: req.check_out,
            guests: req.guests,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ReservationResponse::from(reservation)),
    ))
}

/// POST /api/short-stay/reservations/:id/pay - opens a gateway order
pub async fn start_payment(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(reservation_id): Path<ReservationId>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state
        .start_stay_payment_handler()
        .handle(StartStayPaymentCommand {
            guest_id: user.id,
            reservation_id,
        })
        .await?;
    Ok(Json(order))
}

/// POST /api/short-stay/reservations/confirm-payment
pub async fn confirm_payment(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(req): ApiJson<ConfirmPaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let reservation = state
        .confirm_stay_payment_handler()
        .handle(ConfirmStayPaymentCommand {
            guest_id: user.id,
            order_id: req.order_id,
            payment_id: req.payment_id,
            signature: req.signature,
        })
        .await?;
    Ok(Json(ReservationResponse::from(reservation)))
}

/// POST /api/short-stay/reservations/:id/cancel - guest or host, before check-in
pub async fn cancel_reservation(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(reservation_id): Path<ReservationId>,
) -> Result<impl IntoResponse, ApiError> {
    let reservation = state
        .cancel_reservation_handler()
        .handle(CancelReservationCommand {
            actor_id: user.id,
            reservation_id,
        })
        .await?;
    Ok(Json(ReservationResponse::from(reservation)))
}

/// POST /api/short-stay/reservations/:id/complete - host, after check-out
pub async fn complete_reservation(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(reservation_id): Path<ReservationId>,
) -> Result<impl IntoResponse, ApiError> {
    let reservation = state
        .complete_reservation_handler()
        .handle(CompleteReservationCommand {
            actor_id: user.id,
            reservation_id,
        })
        .await?;
    Ok(Json(ReservationResponse::from(reservation)))
}

/// GET /api/short-stay/reservations/mine
pub async fn my_reservations(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let reservations = state.repos.reservations.list_for_guest(&user.id).await?;
    let body: Vec<ReservationResponse> = reservations.into_iter().map(Into::into).collect();
    Ok(Json(body))
}

/// GET /api/short-stay/host/reservations
pub async fn host_reservations(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let reservations = state.repos.reservations.list_for_host(&user.id).await?;
    let body: Vec<ReservationResponse> = reservations.into_iter().map(Into::into).collect();
    Ok(Json(body))
}
