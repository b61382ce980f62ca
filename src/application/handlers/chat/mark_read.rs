//! MarkReadHandler - Read receipts.

use std::sync::Arc;

use crate::domain::chat::ChatEvent;
use crate::domain::foundation::{ConversationId, DomainError, Timestamp, UserId};
use crate::ports::{ChatBroadcaster, ChatRepository};

use super::load_for_participant;

#[derive(Debug, Clone)]
pub struct MarkReadCommand {
    pub reader_id: UserId,
    pub conversation_id: ConversationId,
}

pub struct MarkReadHandler {
    chats: Arc<dyn ChatRepository>,
    broadcaster: Arc<dyn ChatBroadcaster>,
}

impl MarkReadHandler {
    pub fn new(chats: Arc<dyn ChatRepository>, broadcaster: Arc<dyn ChatBroadcaster>) -> Self {
        Self { chats, broadcaster }
    }

    /// Returns the number of messages marked. Nothing is pushed when zero.
    pub async fn handle(&self, cmd: MarkReadCommand) -> Result<u64, DomainError> {
        let conversation = load_for_participant(&self.chats, &cmd.conversation_id, &cmd.reader_id).await?;
        let now = Timestamp::now();
        let marked = self.chats.mark_read(&conversation.id, &cmd.reader_id, now).await?;

        if marked > 0 {
            self.broadcaster
                .publish(
                    &conversation.id,
                    ChatEvent::Read {
                        conversation_id: conversation.id,
                        reader_id: cmd.reader_id,
                        read_at: now,
                    },
                )
                .await;
        }
        Ok(marked)
    }
}
