//! GetConversationHandler - One conversation for a participant.

use std::sync::Arc;

use crate::domain::chat::Conversation;
use crate::domain::foundation::{ConversationId, DomainError, UserId};
use crate::ports::ChatRepository;

use super::load_for_participant;

#[derive(Debug, Clone)]
pub struct GetConversationQuery {
    pub viewer_id: UserId,
    pub conversation_id: ConversationId,
}

pub struct GetConversationHandler {
    chats: Arc<dyn ChatRepository>,
}

impl GetConversationHandler {
    pub fn new(chats: Arc<dyn ChatRepository>) -> Self {
        Self { chats }
    }

    pub async fn handle(&self, query: GetConversationQuery) -> Result<Conversation, DomainError> {
        load_for_participant(&self.chats, &query.conversation_id, &query.viewer_id).await
    }
}
