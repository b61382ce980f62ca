//! Property listing persistence port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, Page, PageRequest, PropertyId, UserId};
use crate::domain::property::{Property, PropertySearch, PropertyStatus};

#[async_trait]
pub trait PropertyRepository: Send + Sync {
    async fn create(&self, property: &Property) -> Result<(), DomainError>;

    async fn update(&self, property: &Property) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &PropertyId) -> Result<Option<Property>, DomainError>;

    /// Public search over active listings. Featured listings sort first.
    async fn search(&self, search: &PropertySearch, page: PageRequest) -> Result<Page<Property>, DomainError>;

    async fn list_by_owner(&self, owner: &UserId, page: PageRequest) -> Result<Page<Property>, DomainError>;

    /// Admin moderation queue. `None` lists every status.
    async fn list_by_status(
        &self,
        status: Option<PropertyStatus>,
        page: PageRequest,
    ) -> Result<Page<Property>, DomainError>;

    /// Listings that count against the owner's plan limit
    /// (pending review, active or rejected).
    async fn count_counted_for_owner(&self, owner: &UserId) -> Result<i64, DomainError>;

    async fn increment_views(&self, id: &PropertyId) -> Result<(), DomainError>;

    /// Returns false if nothing was deleted.
    async fn delete(&self, id: &PropertyId) -> Result<bool, DomainError>;
}
