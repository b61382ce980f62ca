//! GetPropertyHandler - Single listing with visibility rules.

use std::sync::Arc;

use crate::domain::foundation::{AuthenticatedUser, DomainError, ErrorCode, PropertyId};
use crate::domain::property::Property;
use crate::ports::PropertyRepository;

#[derive(Debug, Clone)]
pub struct GetPropertyQuery {
    pub property_id: PropertyId,
    pub viewer: Option<AuthenticatedUser>,
}

pub struct GetPropertyHandler {
    properties: Arc<dyn PropertyRepository>,
}

impl GetPropertyHandler {
    pub fn new(properties: Arc<dyn PropertyRepository>) -> Self {
        Self { properties }
    }

    /// Active listings are public. Other states are visible to the owner and
    /// admins only; everyone else gets not found.
    pub async fn handle(&self, query: GetPropertyQuery) -> Result<Property, DomainError> {
        let not_found =
            || DomainError::not_found(ErrorCode::PropertyNotFound, "Property", query.property_id);
        let mut property = self
            .properties
            .find_by_id(&query.property_id)
            .await?
            .ok_or_else(not_found)?;

        let manager = query
            .viewer
            .as_ref()
            .map(|v| v.can_manage(&property.owner_id))
            .unwrap_or(false);
        if !property.is_public() && !manager {
            return Err(not_found());
        }

        let own_view = query
            .viewer
            .as_ref()
            .map(|v| v.id == property.owner_id)
            .unwrap_or(false);
        if property.is_public() && !own_view {
            match self.properties.increment_views(&property.id).await {
                Ok(()) => property.view_count += 1,
                Err(e) => tracing::warn!(property_id = %property.id, error = %e, "View count not recorded"),
            }
        }
        Ok(property)
    }
}
