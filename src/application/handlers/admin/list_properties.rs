//! ListPropertiesByStatusHandler - Admin moderation queue.

use std::sync::Arc;

use crate::domain::foundation::{AuthenticatedUser, DomainError, Page, PageRequest};
use crate::domain::property::{Property, PropertyStatus};
use crate::ports::PropertyRepository;

#[derive(Debug, Clone)]
pub struct ListPropertiesByStatusQuery {
    pub actor: AuthenticatedUser,
    /// `None` lists every status.
    pub status: Option<PropertyStatus>,
    pub page: PageRequest,
}

pub struct ListPropertiesByStatusHandler {
    properties: Arc<dyn PropertyRepository>,
}

impl ListPropertiesByStatusHandler {
    pub fn new(properties: Arc<dyn PropertyRepository>) -> Self {
        Self { properties }
    }

    pub async fn handle(&self, query: ListPropertiesByStatusQuery) -> Result<Page<Property>, DomainError> {
        query.actor.require_admin()?;
        self.properties.list_by_status(query.status, query.page).await
    }
}
