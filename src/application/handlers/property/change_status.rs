//! ChangePropertyStatusHandler - Owner-driven lifecycle moves.

use std::sync::Arc;

use crate::domain::foundation::{AuthenticatedUser, DomainError, PropertyId};
use crate::domain::property::Property;
use crate::ports::PropertyRepository;

use super::load_managed;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerStatusAction {
    MarkSold,
    Archive,
}

#[derive(Debug, Clone)]
pub struct ChangePropertyStatusCommand {
    pub actor: AuthenticatedUser,
    pub property_id: PropertyId,
    pub action: OwnerStatusAction,
}

pub struct ChangePropertyStatusHandler {
    properties: Arc<dyn PropertyRepository>,
}

impl ChangePropertyStatusHandler {
    pub fn new(properties: Arc<dyn PropertyRepository>) -> Self {
        Self { properties }
    }

    pub async fn handle(&self, cmd: ChangePropertyStatusCommand) -> Result<Property, DomainError> {
        let mut property = load_managed(&self.properties, &cmd.actor, &cmd.property_id).await?;
        match cmd.action {
            OwnerStatusAction::MarkSold => property.mark_sold()?,
            OwnerStatusAction::Archive => property.archive()?,
        }
        self.properties.update(&property).await?;

        tracing::info!(property_id = %property.id, status = %property.status, "Listing status changed");
        Ok(property)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::test_support::{active_property, caller, verified_user};
    use crate::domain::foundation::ErrorCode;
    use crate::domain::property::PropertyStatus;

    #[tokio::test]
    async fn sold_is_terminal() {
        let store = InMemoryStore::new();
        let owner = verified_user(&store, "owner@example.com").await;
        let property = active_property(&store, &owner).await;
        let handler = ChangePropertyStatusHandler::new(Arc::new(store.clone()));
        let cmd = |action| ChangePropertyStatusCommand {
            actor: caller(&owner),
            property_id: property.id,
            action,
        };

        let sold = handler.handle(cmd(OwnerStatusAction::MarkSold)).await.unwrap();
        assert_eq!(sold.status, PropertyStatus::Sold);

        let err = handler.handle(cmd(OwnerStatusAction::Archive)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    }
}
