//! GetAvailabilityHandler - Booked ranges for a calendar window.

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::domain::foundation::{DomainError, ListingId, Timestamp};
use crate::domain::short_stay::StayDates;
use crate::ports::{ReservationRepository, StayListingRepository};

use super::load_listing;

const DEFAULT_WINDOW_DAYS: i64 = 90;

#[derive(Debug, Clone)]
pub struct GetAvailabilityQuery {
    pub listing_id: ListingId,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Availability {
    pub listing_id: ListingId,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub booked: Vec<StayDates>,
}

pub struct GetAvailabilityHandler {
    listings: Arc<dyn StayListingRepository>,
    reservations: Arc<dyn ReservationRepository>,
}

impl GetAvailabilityHandler {
    pub fn new(
        listings: Arc<dyn StayListingRepository>,
        reservations: Arc<dyn ReservationRepository>,
    ) -> Self {
        Self {
            listings,
            reservations,
        }
    }

    pub async fn handle(&self, query: GetAvailabilityQuery) -> Result<Availability, DomainError> {
        let now = Timestamp::now();
        let from = query.from.unwrap_or_else(|| now.date());
        let to = query.to.unwrap_or(from + Duration::days(DEFAULT_WINDOW_DAYS));
        let window = StayDates::new(from, to)?;

        let listing = load_listing(&self.listings, &query.listing_id).await?;
        let booked = self
            .reservations
            .blocked_ranges(&listing.id, from, now)
            .await?
            .into_iter()
            .filter(|range| range.overlaps(&window))
            .collect();

        Ok(Availability {
            listing_id: listing.id,
            from,
            to,
            booked,
        })
    }
}
