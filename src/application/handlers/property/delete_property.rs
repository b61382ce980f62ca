//! DeletePropertyHandler - Removes a listing and its dependent records.

use std::sync::Arc;

use crate::domain::foundation::{AuthenticatedUser, DomainError, ErrorCode, PropertyId};
use crate::ports::PropertyRepository;

use super::load_managed;

#[derive(Debug, Clone)]
pub struct DeletePropertyCommand {
    pub actor: AuthenticatedUser,
    pub property_id: PropertyId,
}

pub struct DeletePropertyHandler {
    properties: Arc<dyn PropertyRepository>,
}

impl DeletePropertyHandler {
    pub fn new(properties: Arc<dyn PropertyRepository>) -> Self {
        Self { properties }
    }

    pub async fn handle(&self, cmd: DeletePropertyCommand) -> Result<(), DomainError> {
        load_managed(&self.properties, &cmd.actor, &cmd.property_id).await?;
        if !self.properties.delete(&cmd.property_id).await? {
            return Err(DomainError::not_found(
                ErrorCode::PropertyNotFound,
                "Property",
                cmd.property_id,
            ));
        }
        tracing::info!(property_id = %cmd.property_id, actor = %cmd.actor.id, "Listing deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::test_support::{
        active_property, admin_user, caller, verified_user,
    };

    #[tokio::test]
    async fn admin_can_delete_any_listing() {
        let store = InMemoryStore::new();
        let owner = verified_user(&store, "owner@example.com").await;
        let admin = admin_user(&store).await;
        let property = active_property(&store, &owner).await;

        DeletePropertyHandler::new(Arc::new(store.clone()))
            .handle(DeletePropertyCommand {
                actor: caller(&admin),
                property_id: property.id,
            })
            .await
            .unwrap();

        assert!(PropertyRepository::find_by_id(&store, &property.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn missing_listing_is_not_found() {
        let store = InMemoryStore::new();
        let owner = verified_user(&store, "owner@example.com").await;
        let err = DeletePropertyHandler::new(Arc::new(store.clone()))
            .handle(DeletePropertyCommand {
                actor: caller(&owner),
                property_id: PropertyId::new(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PropertyNotFound);
    }
}
