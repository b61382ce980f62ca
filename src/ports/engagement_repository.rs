//! Wishlist and review persistence ports.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, Page, PageRequest, PropertyId, ReviewId, UserId};
use crate::domain::property::Property;
use crate::domain::review::{Review, ReviewSummary};

#[async_trait]
pub trait WishlistRepository: Send + Sync {
    /// Returns false when the property was already saved.
    async fn add(&self, user: &UserId, property: &PropertyId) -> Result<bool, DomainError>;

    /// Returns false when the property was not saved.
    async fn remove(&self, user: &UserId, property: &PropertyId) -> Result<bool, DomainError>;

    /// Saved properties, most recently saved first.
    async fn list(&self, user: &UserId, page: PageRequest) -> Result<Page<Property>, DomainError>;

    async fn contains(&self, user: &UserId, property: &PropertyId) -> Result<bool, DomainError>;

    /// Ids of every saved property, for marking cards in listings.
    async fn saved_ids(&self, user: &UserId) -> Result<Vec<PropertyId>, DomainError>;
}

/// Review joined with its author's display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewView {
    pub review: Review,
    pub author_name: String,
}

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// # Errors
    ///
    /// - `Conflict` if the author already reviewed this property
    async fn create(&self, review: &Review) -> Result<(), DomainError>;

    async fn update(&self, review: &Review) -> Result<(), DomainError>;

    async fn delete(&self, id: &ReviewId) -> Result<bool, DomainError>;

    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, DomainError>;

    async fn list_for_property(
        &self,
        property: &PropertyId,
        page: PageRequest,
    ) -> Result<Page<ReviewView>, DomainError>;

    async fn summary(&self, property: &PropertyId) -> Result<ReviewSummary, DomainError>;
}
