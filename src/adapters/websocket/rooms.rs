//! Chat room management for conversation-scoped fan-out.
//!
//! Each conversation with at least one connected socket has a room backed by
//! a broadcast channel. Both participants (and any second tab they open) join
//! the same room.
//!
//! ```text
//! Room: conversation-123    Room: conversation-456
//! ├── buyer (tab 1)         ├── buyer
//! ├── buyer (tab 2)         └── owner
//! └── owner
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use crate::domain::chat::ChatEvent;
use crate::domain::foundation::ConversationId;
use crate::ports::ChatBroadcaster;

/// Unique identifier for a WebSocket client connection.
///
/// Generated server-side when a client connects.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientId(Uuid);

impl ClientId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registry of conversation rooms.
///
/// Uses `RwLock` for the room registry since publishes (reads) vastly
/// outnumber joins and leaves (writes).
pub struct RoomManager {
    /// conversation_id → broadcast sender for that room.
    rooms: RwLock<HashMap<ConversationId, broadcast::Sender<ChatEvent>>>,

    /// client_id → conversation_id for O(1) cleanup on disconnect.
    client_rooms: RwLock<HashMap<ClientId, ConversationId>>,

    channel_capacity: usize,
}

impl RoomManager {
    /// `channel_capacity` bounds how far a slow socket may lag before it
    /// starts missing events.
    pub fn new(channel_capacity: usize) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            client_rooms: RwLock::new(HashMap::new()),
            channel_capacity,
        }
    }

    /// Create with default capacity (128 events).
    pub fn with_default_capacity() -> Self {
        Self::new(128)
    }

    /// Joins a client to a conversation room, creating the room if needed.
    pub async fn join(
        &self,
        conversation_id: &ConversationId,
        client_id: ClientId,
    ) -> broadcast::Receiver<ChatEvent> {
        let mut rooms = self.rooms.write().await;

        let sender = rooms.entry(*conversation_id).or_insert_with(|| {
            let (tx, _) = broadcast::channel(self.channel_capacity);
            tx
        });

        self.client_rooms
            .write()
            .await
            .insert(client_id, *conversation_id);

        sender.subscribe()
    }

    /// Removes a client. Rooms without receivers are dropped.
    pub async fn leave(&self, client_id: &ClientId) {
        let mut client_rooms = self.client_rooms.write().await;

        if let Some(conversation_id) = client_rooms.remove(client_id) {
            let rooms = self.rooms.read().await;
            if let Some(sender) = rooms.get(&conversation_id) {
                if sender.receiver_count() == 0 {
                    drop(rooms);
                    self.rooms.write().await.remove(&conversation_id);
                }
            }
        }
    }

    /// Sends an event to every socket in the room. No-op without listeners.
    pub async fn broadcast(&self, conversation_id: &ConversationId, event: ChatEvent) -> usize {
        let rooms = self.rooms.read().await;
        match rooms.get(conversation_id) {
            Some(sender) => sender.send(event).unwrap_or(0),
            None => 0,
        }
    }

    pub async fn client_count(&self, conversation_id: &ConversationId) -> usize {
        let rooms = self.rooms.read().await;
        rooms
            .get(conversation_id)
            .map(|s| s.receiver_count())
            .unwrap_or(0)
    }

    pub async fn active_rooms(&self) -> Vec<ConversationId> {
        self.rooms.read().await.keys().cloned().collect()
    }

    pub async fn total_client_count(&self) -> usize {
        self.client_rooms.read().await.len()
    }
}

impl Default for RoomManager {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

#[async_trait]
impl ChatBroadcaster for RoomManager {
    async fn publish(&self, conversation: &ConversationId, event: ChatEvent) {
        let delivered = self.broadcast(conversation, event).await;
        tracing::trace!(conversation_id = %conversation, delivered, "Chat event published");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Timestamp, UserId};
    use std::sync::Arc;

    fn read_event(conversation_id: ConversationId) -> ChatEvent {
        ChatEvent::Read {
            conversation_id,
            reader_id: UserId::new(),
            read_at: Timestamp::now(),
        }
    }

    #[tokio::test]
    async fn join_creates_room_if_not_exists() {
        let manager = RoomManager::with_default_capacity();
        let conversation = ConversationId::new();

        let _rx = manager.join(&conversation, ClientId::new()).await;

        assert_eq!(manager.active_rooms().await, vec![conversation]);
    }

    #[tokio::test]
    async fn both_participants_receive_published_events() {
        let manager = Arc::new(RoomManager::with_default_capacity());
        let conversation = ConversationId::new();

        let mut buyer = manager.join(&conversation, ClientId::new()).await;
        let mut owner = manager.join(&conversation, ClientId::new()).await;

        manager.publish(&conversation, read_event(conversation)).await;

        assert!(matches!(buyer.recv().await.unwrap(), ChatEvent::Read { .. }));
        assert!(matches!(owner.recv().await.unwrap(), ChatEvent::Read { .. }));
    }

    #[tokio::test]
    async fn rooms_are_isolated() {
        let manager = RoomManager::with_default_capacity();
        let first = ConversationId::new();
        let second = ConversationId::new();

        let _rx1 = manager.join(&first, ClientId::new()).await;
        let mut rx2 = manager.join(&second, ClientId::new()).await;

        assert_eq!(manager.broadcast(&first, read_event(first)).await, 1);
        assert!(rx2.try_recv().is_err());
    }

    #[tokio::test]
    async fn leave_cleans_up_empty_room() {
        let manager = RoomManager::with_default_capacity();
        let conversation = ConversationId::new();
        let client_id = ClientId::new();

        {
            let _rx = manager.join(&conversation, client_id.clone()).await;
        }

        manager.leave(&client_id).await;

        assert!(manager.active_rooms().await.is_empty());
        assert_eq!(manager.total_client_count().await, 0);
    }

    #[tokio::test]
    async fn publish_without_listeners_is_noop() {
        let manager = RoomManager::with_default_capacity();
        let conversation = ConversationId::new();

        assert_eq!(manager.broadcast(&conversation, read_event(conversation)).await, 0);
        assert_eq!(manager.client_count(&conversation).await, 0);
    }
}
