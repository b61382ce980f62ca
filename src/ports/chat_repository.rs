//! Chat persistence and fan-out ports.

use async_trait::async_trait;

use crate::domain::chat::{ChatEvent, ChatMessage, Conversation, ConversationSummary};
use crate::domain::foundation::{ConversationId, DomainError, Page, PageRequest, Timestamp, UserId};

#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Returns the existing conversation for `(property, buyer)` or stores `candidate`.
    async fn find_or_create(&self, candidate: &Conversation) -> Result<Conversation, DomainError>;

    async fn find_by_id(&self, id: &ConversationId) -> Result<Option<Conversation>, DomainError>;

    /// Conversations the user takes part in, most recent activity first.
    async fn list_for_user(&self, user: &UserId) -> Result<Vec<ConversationSummary>, DomainError>;

    /// Messages newest first.
    async fn list_messages(
        &self,
        conversation: &ConversationId,
        page: PageRequest,
    ) -> Result<Page<ChatMessage>, DomainError>;

    /// Stores the message and bumps the conversation's `last_message_at`.
    async fn append(&self, message: &ChatMessage) -> Result<(), DomainError>;

    /// Marks the counterpart's unread messages as read. Returns the number marked.
    async fn mark_read(
        &self,
        conversation: &ConversationId,
        reader: &UserId,
        at: Timestamp,
    ) -> Result<u64, DomainError>;
}

/// Pushes chat events to connected sockets. Delivery is best effort.
#[async_trait]
pub trait ChatBroadcaster: Send + Sync {
    async fn publish(&self, conversation: &ConversationId, event: ChatEvent);
}
