use async_trait::async_trait;

use crate::domain::chat::{ChatMessage, Conversation, ConversationSummary};
use crate::domain::foundation::{
    ConversationId, DomainError, ErrorCode, Page, PageRequest, Timestamp, UserId,
};
use crate::ports::ChatRepository;

use super::{paginate, InMemoryStore};

#[async_trait]
impl ChatRepository for InMemoryStore {
    async fn find_or_create(&self, candidate: &Conversation) -> Result<Conversation, DomainError> {
        let mut t = self.tables();
        if let Some(existing) = t.conversations.values().find(|c| {
            c.property_id == candidate.property_id && c.buyer_id == candidate.buyer_id
        }) {
            return Ok(existing.clone());
        }
        t.conversations.insert(candidate.id, candidate.clone());
        Ok(candidate.clone())
    }

    async fn find_by_id(&self, id: &ConversationId) -> Result<Option<Conversation>, DomainError> {
        Ok(self.tables().conversations.get(id).cloned())
    }

    async fn list_for_user(&self, user: &UserId) -> Result<Vec<ConversationSummary>, DomainError> {
        let t = self.tables();
        let mut summaries: Vec<ConversationSummary> = t
            .conversations
            .values()
            .filter(|c| c.is_participant(user))
            .map(|c| {
                let messages = t.messages.iter().filter(|m| m.conversation_id == c.id);
                ConversationSummary {
                    conversation: c.clone(),
                    property_title: t
                        .properties
                        .get(&c.property_id)
                        .map(|p| p.details.title.clone())
                        .unwrap_or_default(),
                    counterpart_name: t
                        .users
                        .get(&c.counterpart(user))
                        .map(|u| u.name.clone())
                        .unwrap_or_default(),
                    last_message: messages
                        .clone()
                        .max_by_key(|m| m.created_at)
                        .map(|m| m.body.clone()),
                    unread_count: messages
                        .filter(|m| &m.sender_id != user && m.read_at.is_none())
                        .count() as i64,
                }
            })
            .collect();
        summaries.sort_by(|a, b| {
            let key = |s: &ConversationSummary| {
                s.conversation
                    .last_message_at
                    .unwrap_or(s.conversation.created_at)
            };
            key(b).cmp(&key(a))
        });
        Ok(summaries)
    }

    async fn list_messages(
        &self,
        conversation: &ConversationId,
        page: PageRequest,
    ) -> Result<Page<ChatMessage>, DomainError> {
        let t = self.tables();
        let mut found: Vec<ChatMessage> = t
            .messages
            .iter()
            .filter(|m| &m.conversation_id == conversation)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(found, page))
    }

    async fn append(&self, message: &ChatMessage) -> Result<(), DomainError> {
        let mut t = self.tables();
        let conversation = t.conversations.get_mut(&message.conversation_id).ok_or_else(|| {
            DomainError::not_found(
                ErrorCode::ConversationNotFound,
                "Conversation",
                message.conversation_id,
            )
        })?;
        conversation.last_message_at = Some(message.created_at);
        t.messages.push(message.clone());
        Ok(())
    }

    async fn mark_read(
        &self,
        conversation: &ConversationId,
        reader: &UserId,
        at: Timestamp,
    ) -> Result<u64, DomainError> {
        let mut t = self.tables();
        let mut marked = 0;
        for m in t.messages.iter_mut() {
            if &m.conversation_id == conversation && &m.sender_id != reader && m.read_at.is_none() {
                m.read_at = Some(at);
                marked += 1;
            }
        }
        Ok(marked)
    }
}
