//! ListConversationsHandler - The caller's inbox.

use std::sync::Arc;

use crate::domain::chat::ConversationSummary;
use crate::domain::foundation::{DomainError, UserId};
use crate::ports::ChatRepository;

pub struct ListConversationsHandler {
    chats: Arc<dyn ChatRepository>,
}

impl ListConversationsHandler {
    pub fn new(chats: Arc<dyn ChatRepository>) -> Self {
        Self { chats }
    }

    pub async fn handle(&self, user_id: UserId) -> Result<Vec<ConversationSummary>, DomainError> {
        self.chats.list_for_user(&user_id).await
    }
}
