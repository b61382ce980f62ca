//! Marketing lead and newsletter ports.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, LeadId, Page, PageRequest};
use crate::domain::marketing::{Lead, LeadSource, LeadStatus};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadFilter {
    pub status: Option<LeadStatus>,
    pub source: Option<LeadSource>,
}

#[async_trait]
pub trait LeadRepository: Send + Sync {
    async fn create(&self, lead: &Lead) -> Result<(), DomainError>;

    async fn update(&self, lead: &Lead) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &LeadId) -> Result<Option<Lead>, DomainError>;

    async fn list(&self, filter: &LeadFilter, page: PageRequest) -> Result<Page<Lead>, DomainError>;

    /// Idempotent. Returns false when the email was already subscribed.
    async fn subscribe(&self, email: &str) -> Result<bool, DomainError>;

    /// Returns false when the email was not subscribed.
    async fn unsubscribe(&self, email: &str) -> Result<bool, DomainError>;
}
