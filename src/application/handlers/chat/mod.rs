//! Chat handlers.
//!
//! ## Commands
//! - `StartConversationHandler` - Opens (or reuses) a buyer/owner thread
//! - `SendMessageHandler` - Stores a message and pushes it to open sockets
//! - `MarkReadHandler` - Read receipts for the counterpart's messages
//!
//! ## Queries
//! - `GetConversationHandler`, `ListConversationsHandler`
//! - `ListMessagesHandler` - Participants only, newest first

mod get_conversation;
mod list_conversations;
mod list_messages;
mod mark_read;
mod send_message;
mod start_conversation;

pub use get_conversation::{GetConversationHandler, GetConversationQuery};
pub use list_conversations::ListConversationsHandler;
pub use list_messages::{ListMessagesHandler, ListMessagesQuery};
pub use mark_read::{MarkReadCommand, MarkReadHandler};
pub use send_message::{SendMessageCommand, SendMessageHandler};
pub use start_conversation::{StartConversationCommand, StartConversationHandler};

use std::sync::Arc;

use crate::domain::chat::Conversation;
use crate::domain::foundation::{ConversationId, DomainError, ErrorCode, UserId};
use crate::ports::ChatRepository;

/// Loads a conversation the caller takes part in.
///
/// Strangers get `Forbidden`, matching what the socket endpoint returns.
pub(crate) async fn load_for_participant(
    chats: &Arc<dyn ChatRepository>,
    id: &ConversationId,
    user: &UserId,
) -> Result<Conversation, DomainError> {
    let conversation = chats
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found(ErrorCode::ConversationNotFound, "Conversation", id))?;
    conversation.ensure_participant(user)?;
    Ok(conversation)
}
