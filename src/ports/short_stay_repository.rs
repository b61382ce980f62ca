//! Short-stay listing and reservation ports.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::foundation::{
    DomainError, ListingId, Page, PageRequest, ReservationId, Timestamp, UserId,
};
use crate::domain::short_stay::{Reservation, ReservationStatus, StayDates, StayListing};

/// Filter for the public short-stay search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaySearch {
    pub city: Option<String>,
    pub guests: Option<i64>,
    pub max_rate: Option<i64>,
    /// Only listings free for these dates.
    pub dates: Option<StayDates>,
}

#[async_trait]
pub trait StayListingRepository: Send + Sync {
    async fn create(&self, listing: &StayListing) -> Result<(), DomainError>;

    async fn update(&self, listing: &StayListing) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &ListingId) -> Result<Option<StayListing>, DomainError>;

    /// Active listings only.
    async fn search(
        &self,
        search: &StaySearch,
        now: Timestamp,
        page: PageRequest,
    ) -> Result<Page<StayListing>, DomainError>;

    async fn list_by_host(&self, host: &UserId) -> Result<Vec<StayListing>, DomainError>;

    /// Deletes a listing with no upcoming confirmed reservation.
    ///
    /// # Errors
    ///
    /// - `Conflict` if a confirmed reservation has not checked out yet
    async fn delete(&self, id: &ListingId, today: NaiveDate) -> Result<bool, DomainError>;
}

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Inserts a hold unless it overlaps a blocking reservation.
    ///
    /// The listing row is locked for the duration of the overlap check so two
    /// concurrent requests for the same nights cannot both succeed.
    ///
    /// # Errors
    ///
    /// - `DatesUnavailable` if the nights overlap a confirmed reservation or a live hold
    async fn reserve(&self, reservation: &Reservation, now: Timestamp) -> Result<(), DomainError>;

    /// Writes `reservation` only if the stored row is still in `expected`.
    ///
    /// A pending row moves on only while its stored hold is live at
    /// `reservation.updated_at`, except when it is being cancelled.
    ///
    /// # Errors
    ///
    /// - `ReservationNotFound` if the row is gone
    /// - `Conflict` if the row changed underneath the caller or its hold lapsed
    async fn update(
        &self,
        reservation: &Reservation,
        expected: ReservationStatus,
    ) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &ReservationId) -> Result<Option<Reservation>, DomainError>;

    async fn find_by_order_id(&self, order_id: &str) -> Result<Option<Reservation>, DomainError>;

    async fn list_for_guest(&self, guest: &UserId) -> Result<Vec<Reservation>, DomainError>;

    async fn list_for_host(&self, host: &UserId) -> Result<Vec<Reservation>, DomainError>;

    /// Ranges that currently block the listing's calendar, from `from` onward.
    async fn blocked_ranges(
        &self,
        listing: &ListingId,
        from: NaiveDate,
        now: Timestamp,
    ) -> Result<Vec<StayDates>, DomainError>;

    /// Cancels pending reservations whose hold lapsed. Returns the number cancelled.
    async fn expire_stale_holds(&self, now: Timestamp) -> Result<u64, DomainError>;
}
