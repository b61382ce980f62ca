//! SendMessageHandler - Stores a message and fans it out.

use std::sync::Arc;

use crate::domain::chat::{ChatEvent, ChatMessage};
use crate::domain::foundation::{ConversationId, DomainError, UserId};
use crate::ports::{ChatBroadcaster, ChatRepository};

use super::load_for_participant;

#[derive(Debug, Clone)]
pub struct SendMessageCommand {
    pub sender_id: UserId,
    pub conversation_id: ConversationId,
    pub body: String,
}

pub struct SendMessageHandler {
    chats: Arc<dyn ChatRepository>,
    broadcaster: Arc<dyn ChatBroadcaster>,
}

impl SendMessageHandler {
    pub fn new(chats: Arc<dyn ChatRepository>, broadcaster: Arc<dyn ChatBroadcaster>) -> Self {
        Self { chats, broadcaster }
    }

    pub async fn handle(&self, cmd: SendMessageCommand) -> Result<ChatMessage, DomainError> {
        // 1. Participant check and body rules
        let conversation = load_for_participant(&self.chats, &cmd.conversation_id, &cmd.sender_id).await?;
        let message = ChatMessage::compose(&conversation, cmd.sender_id, &cmd.body)?;

        // 2. Persist before anyone sees it
        self.chats.append(&message).await?;

        // 3. Push to open sockets
        self.broadcaster
            .publish(
                &conversation.id,
                ChatEvent::NewMessage {
                    message: message.clone(),
                },
            )
            .await;

        tracing::debug!(conversation_id = %conversation.id, message_id = %message.id, "Message sent");
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::adapters::websocket::{ClientId, RoomManager};
    use crate::application::handlers::chat::fixtures::conversation;
    use crate::application::handlers::test_support::verified_user;
    use crate::domain::foundation::ErrorCode;

    #[tokio::test]
    async fn message_is_stored_and_pushed_to_room() {
        let store = InMemoryStore::new();
        let owner = verified_user(&store, "owner@example.com").await;
        let buyer = verified_user(&store, "buyer@example.com").await;
        let conv = conversation(&store, &owner, &buyer).await;
        let rooms = Arc::new(RoomManager::with_default_capacity());
        let mut owner_socket = rooms.join(&conv.id, ClientId::new()).await;

        let message = SendMessageHandler::new(Arc::new(store.clone()), rooms.clone())
            .handle(SendMessageCommand {
                sender_id: buyer.id,
                conversation_id: conv.id,
                body: "  Is parking included?  ".into(),
            })
            .await
            .unwrap();
        assert_eq!(message.body, "Is parking included?");

        match owner_socket.recv().await.unwrap() {
            ChatEvent::NewMessage { message: pushed } => assert_eq!(pushed.id, message.id),
            other => panic!("unexpected event {:?}", other),
        }
        let inbox = store.list_for_user(&owner.id).await.unwrap();
        assert_eq!(inbox[0].unread_count, 1);
    }

    #[tokio::test]
    async fn blank_message_is_rejected() {
        let store = InMemoryStore::new();
        let owner = verified_user(&store, "owner@example.com").await;
        let buyer = verified_user(&store, "buyer@example.com").await;
        let conv = conversation(&store, &owner, &buyer).await;

        let err = SendMessageHandler::new(Arc::new(store.clone()), Arc::new(RoomManager::default()))
            .handle(SendMessageCommand {
                sender_id: owner.id,
                conversation_id: conv.id,
                body: "   ".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}
