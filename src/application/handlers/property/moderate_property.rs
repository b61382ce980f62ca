//! ModeratePropertyHandler - Admin review of submitted listings.

use std::sync::Arc;

use crate::domain::foundation::{AuthenticatedUser, DomainError, ErrorCode, PropertyId};
use crate::domain::property::Property;
use crate::ports::PropertyRepository;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModerateAction {
    Approve,
    Reject { reason: String },
    Feature(bool),
}

#[derive(Debug, Clone)]
pub struct ModeratePropertyCommand {
    pub actor: AuthenticatedUser,
    pub property_id: PropertyId,
    pub action: ModerateAction,
}

pub struct ModeratePropertyHandler {
    properties: Arc<dyn PropertyRepository>,
}

impl ModeratePropertyHandler {
    pub fn new(properties: Arc<dyn PropertyRepository>) -> Self {
        Self { properties }
    }

    pub async fn handle(&self, cmd: ModeratePropertyCommand) -> Result<Property, DomainError> {
        cmd.actor.require_admin()?;
        let mut property = self
            .properties
            .find_by_id(&cmd.property_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(ErrorCode::PropertyNotFound, "Property", cmd.property_id)
            })?;

        match &cmd.action {
            ModerateAction::Approve => property.approve()?,
            ModerateAction::Reject { reason } => property.reject(reason)?,
            ModerateAction::Feature(featured) => property.set_featured(*featured)?,
        }
        self.properties.update(&property).await?;

        tracing::info!(
            property_id = %property.id,
            admin_id = %cmd.actor.id,
            action = ?cmd.action,
            "Listing moderated"
        );
        Ok(property)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::test_support::{admin_user, caller, verified_user};
    use crate::domain::property::{sample_input, PropertyStatus};

    async fn pending(store: &InMemoryStore) -> Property {
        let owner = verified_user(store, "owner@example.com").await;
        let property = Property::create(owner.id, sample_input().validate().unwrap());
        PropertyRepository::create(store, &property).await.unwrap();
        property
    }

    #[tokio::test]
    async fn admin_approves_then_features() {
        let store = InMemoryStore::new();
        let admin = admin_user(&store).await;
        let property = pending(&store).await;
        let handler = ModeratePropertyHandler::new(Arc::new(store.clone()));
        let cmd = |action| ModeratePropertyCommand {
            actor: caller(&admin),
            property_id: property.id,
            action,
        };

        let err = handler.handle(cmd(ModerateAction::Feature(true))).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        handler.handle(cmd(ModerateAction::Approve)).await.unwrap();
        let featured = handler.handle(cmd(ModerateAction::Feature(true))).await.unwrap();
        assert_eq!(featured.status, PropertyStatus::Active);
        assert!(featured.featured);
    }

    #[tokio::test]
    async fn rejection_records_reason() {
        let store = InMemoryStore::new();
        let admin = admin_user(&store).await;
        let property = pending(&store).await;

        let rejected = ModeratePropertyHandler::new(Arc::new(store.clone()))
            .handle(ModeratePropertyCommand {
                actor: caller(&admin),
                property_id: property.id,
                action: ModerateAction::Reject {
                    reason: "Address missing".into(),
                },
            })
            .await
            .unwrap();
        assert_eq!(rejected.status, PropertyStatus::Rejected);
        assert_eq!(rejected.rejection_reason.as_deref(), Some("Address missing"));
    }

    #[tokio::test]
    async fn regular_users_cannot_moderate() {
        let store = InMemoryStore::new();
        let property = pending(&store).await;
        let user = verified_user(&store, "someone@example.com").await;

        let err = ModeratePropertyHandler::new(Arc::new(store.clone()))
            .handle(ModeratePropertyCommand {
                actor: caller(&user),
                property_id: property.id,
                action: ModerateAction::Approve,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }
}
