//! GetBookingHandler - Booking detail for its visitor or owner.

use std::sync::Arc;

use crate::domain::booking::Booking;
use crate::domain::foundation::{AuthenticatedUser, BookingId, DomainError, ErrorCode};
use crate::ports::BookingRepository;

#[derive(Debug, Clone)]
pub struct GetBookingQuery {
    pub viewer: AuthenticatedUser,
    pub booking_id: BookingId,
}

pub struct GetBookingHandler {
    bookings: Arc<dyn BookingRepository>,
}

impl GetBookingHandler {
    pub fn new(bookings: Arc<dyn BookingRepository>) -> Self {
        Self { bookings }
    }

    pub async fn handle(&self, query: GetBookingQuery) -> Result<Booking, DomainError> {
        let booking = self
            .bookings
            .find_by_id(&query.booking_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(ErrorCode::BookingNotFound, "Booking", query.booking_id)
            })?;
        if !booking.is_participant(&query.viewer.id) && !query.viewer.is_admin() {
            return Err(DomainError::forbidden("Not a participant in this booking"));
        }
        Ok(booking)
    }
}
