//! Site-visit booking persistence port.

use async_trait::async_trait;

use crate::domain::booking::Booking;
use crate::domain::foundation::{BookingId, DomainError, Page, PageRequest, PropertyId, UserId};

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Inserts a booking.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the visitor already has an open booking for the property
    async fn create(&self, booking: &Booking) -> Result<(), DomainError>;

    async fn update(&self, booking: &Booking) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, DomainError>;

    /// True if a pending or confirmed booking exists for this visitor and property.
    async fn has_open_booking(&self, visitor: &UserId, property: &PropertyId) -> Result<bool, DomainError>;

    async fn list_for_visitor(&self, visitor: &UserId, page: PageRequest) -> Result<Page<Booking>, DomainError>;

    async fn list_for_owner(&self, owner: &UserId, page: PageRequest) -> Result<Page<Booking>, DomainError>;
}
