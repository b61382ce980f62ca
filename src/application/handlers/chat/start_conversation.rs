//! StartConversationHandler - Buyer contacts a property owner.

use std::sync::Arc;

use crate::domain::chat::Conversation;
use crate::domain::foundation::{DomainError, ErrorCode, PropertyId, UserId};
use crate::ports::{ChatRepository, PropertyRepository};

#[derive(Debug, Clone)]
pub struct StartConversationCommand {
    pub buyer_id: UserId,
    pub property_id: PropertyId,
}

pub struct StartConversationHandler {
    chats: Arc<dyn ChatRepository>,
    properties: Arc<dyn PropertyRepository>,
}

impl StartConversationHandler {
    pub fn new(chats: Arc<dyn ChatRepository>, properties: Arc<dyn PropertyRepository>) -> Self {
        Self { chats, properties }
    }

    /// Returns the existing thread when the buyer already asked about this property.
    pub async fn handle(&self, cmd: StartConversationCommand) -> Result<Conversation, DomainError> {
        let property = self
            .properties
            .find_by_id(&cmd.property_id)
            .await?
            .filter(|p| p.is_public())
            .ok_or_else(|| {
                DomainError::not_found(ErrorCode::PropertyNotFound, "Property", cmd.property_id)
            })?;

        let candidate = Conversation::start(property.id, property.owner_id, cmd.buyer_id)?;
        let conversation = self.chats.find_or_create(&candidate).await?;
        if conversation.id == candidate.id {
            tracing::info!(conversation_id = %conversation.id, property_id = %property.id, "Conversation started");
        }
        Ok(conversation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::test_support::{active_property, verified_user};

    #[tokio::test]
    async fn second_start_reuses_thread() {
        let store = InMemoryStore::new();
        let owner = verified_user(&store, "owner@example.com").await;
        let buyer = verified_user(&store, "buyer@example.com").await;
        let property = active_property(&store, &owner).await;
        let shared = Arc::new(store.clone());
        let handler = StartConversationHandler::new(shared.clone(), shared);
        let cmd = || StartConversationCommand {
            buyer_id: buyer.id,
            property_id: property.id,
        };

        let first = handler.handle(cmd()).await.unwrap();
        let second = handler.handle(cmd()).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.owner_id, owner.id);
    }

    #[tokio::test]
    async fn owner_cannot_message_themselves() {
        let store = InMemoryStore::new();
        let owner = verified_user(&store, "owner@example.com").await;
        let property = active_property(&store, &owner).await;
        let shared = Arc::new(store.clone());

        let err = StartConversationHandler::new(shared.clone(), shared)
            .handle(StartConversationCommand {
                buyer_id: owner.id,
                property_id: property.id,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}
