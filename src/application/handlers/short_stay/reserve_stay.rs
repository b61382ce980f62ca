//! ReserveStayHandler - Holds dates pending payment.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::foundation::{DomainError, ListingId, Timestamp, UserId};
use crate::domain::short_stay::{Reservation, StayDates};
use crate::ports::{ReservationRepository, StayListingRepository};

use super::load_listing;

#[derive(Debug, Clone)]
pub struct ReserveStayCommand {
    pub guest_id: UserId,
    pub listing_id: ListingId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: i32,
}

pub struct ReserveStayHandler {
    listings: Arc<dyn StayListingRepository>,
    reservations: Arc<dyn ReservationRepository>,
    hold_minutes: i64,
    max_advance_days: i64,
}

impl ReserveStayHandler {
    pub fn new(
        listings: Arc<dyn StayListingRepository>,
        reservations: Arc<dyn ReservationRepository>,
        hold_minutes: i64,
        max_advance_days: i64,
    ) -> Self {
        Self {
            listings,
            reservations,
            hold_minutes,
            max_advance_days,
        }
    }

    pub async fn handle(&self, cmd: ReserveStayCommand) -> Result<Reservation, DomainError> {
        let now = Timestamp::now();

        // 1. Dates inside the booking horizon
        let dates = StayDates::new(cmd.check_in, cmd.check_out)?;
        dates.check_window(now.date(), self.max_advance_days)?;

        // 2. Listing rules and price snapshot
        let listing = load_listing(&self.listings, &cmd.listing_id).await?;
        let reservation =
            Reservation::hold(&listing, cmd.guest_id, dates, cmd.guests, self.hold_minutes, now)?;

        // 3. Overlap check and insert happen atomically in the adapter
        self.reservations.reserve(&reservation, now).await?;

        tracing::info!(
            reservation_id = %reservation.id,
            listing_id = %listing.id,
            nights = dates.nights(),
            "Stay reserved"
        );
        Ok(reservation)
    }
}
