//! ListMessagesHandler - Message history for a participant.

use std::sync::Arc;

use crate::domain::chat::ChatMessage;
use crate::domain::foundation::{ConversationId, DomainError, Page, PageRequest, UserId};
use crate::ports::ChatRepository;

use super::load_for_participant;

#[derive(Debug, Clone)]
pub struct ListMessagesQuery {
    pub viewer_id: UserId,
    pub conversation_id: ConversationId,
    pub page: PageRequest,
}

pub struct ListMessagesHandler {
    chats: Arc<dyn ChatRepository>,
}

impl ListMessagesHandler {
    pub fn new(chats: Arc<dyn ChatRepository>) -> Self {
        Self { chats }
    }

    pub async fn handle(&self, query: ListMessagesQuery) -> Result<Page<ChatMessage>, DomainError> {
        load_for_participant(&self.chats, &query.conversation_id, &query.viewer_id).await?;
        self.chats.list_messages(&query.conversation_id, query.page).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::chat::fixtures::conversation;
    use crate::application::handlers::test_support::verified_user;
    use crate::domain::foundation::ErrorCode;

    #[tokio::test]
    async fn outsider_cannot_read_history() {
        let store = InMemoryStore::new();
        let owner = verified_user(&store, "owner@example.com").await;
        let buyer = verified_user(&store, "buyer@example.com").await;
        let conv = conversation(&store, &owner, &buyer).await;
        let handler = ListMessagesHandler::new(Arc::new(store.clone()));

        let err = handler
            .handle(ListMessagesQuery {
                viewer_id: UserId::new(),
                conversation_id: conv.id,
                page: PageRequest::default(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);

        let page = handler
            .handle(ListMessagesQuery {
                viewer_id: buyer.id,
                conversation_id: conv.id,
                page: PageRequest::default(),
            })
            .await
            .unwrap();
        assert_eq!(page.total, 0);
    }
}
