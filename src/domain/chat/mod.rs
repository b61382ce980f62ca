//! Buyer/owner conversations about a property.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    validation, ConversationId, DomainError, MessageId, PropertyId, Timestamp, UserId,
};

pub const MAX_MESSAGE_CHARS: usize = 2000;

/// One conversation per (property, buyer) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub property_id: PropertyId,
    pub buyer_id: UserId,
    pub owner_id: UserId,
    pub created_at: Timestamp,
    pub last_message_at: Option<Timestamp>,
}

impl Conversation {
    pub fn start(property_id: PropertyId, owner_id: UserId, buyer_id: UserId) -> Result<Self, DomainError> {
        if owner_id == buyer_id {
            return Err(DomainError::validation(
                "property_id",
                "You cannot start a conversation about your own property",
            ));
        }
        Ok(Self {
            id: ConversationId::new(),
            property_id,
            buyer_id,
            owner_id,
            created_at: Timestamp::now(),
            last_message_at: None,
        })
    }

    pub fn is_participant(&self, user_id: &UserId) -> bool {
        &self.buyer_id == user_id || &self.owner_id == user_id
    }

    pub fn ensure_participant(&self, user_id: &UserId) -> Result<(), DomainError> {
        if self.is_participant(user_id) {
            Ok(())
        } else {
            Err(DomainError::forbidden("Not a participant in this conversation"))
        }
    }

    /// The participant who is not `user_id`.
    pub fn counterpart(&self, user_id: &UserId) -> UserId {
        if &self.buyer_id == user_id {
            self.owner_id
        } else {
            self.buyer_id
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub sender_id: UserId,
    pub body: String,
    pub created_at: Timestamp,
    pub read_at: Option<Timestamp>,
}

impl ChatMessage {
    pub fn compose(conversation: &Conversation, sender_id: UserId, body: &str) -> Result<Self, DomainError> {
        conversation.ensure_participant(&sender_id)?;
        Ok(Self {
            id: MessageId::new(),
            conversation_id: conversation.id,
            sender_id,
            body: validation::text("body", body, 1, MAX_MESSAGE_CHARS)?,
            created_at: Timestamp::now(),
            read_at: None,
        })
    }
}

/// Conversation row for the inbox list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationSummary {
    #[serde(flatten)]
    pub conversation: Conversation,
    pub property_title: String,
    pub counterpart_name: String,
    pub last_message: Option<String>,
    pub unread_count: i64,
}

/// Events pushed to WebSocket subscribers of a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    NewMessage { message: ChatMessage },
    Read { conversation_id: ConversationId, reader_id: UserId, read_at: Timestamp },
}

/// Frames accepted from WebSocket clients.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    Send { body: String },
    MarkRead,
    Ping,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversation() -> Conversation {
        Conversation::start(PropertyId::new(), UserId::new(), UserId::new()).unwrap()
    }

    #[test]
    fn owner_cannot_chat_with_self() {
        let owner = UserId::new();
        assert!(Conversation::start(PropertyId::new(), owner, owner).is_err());
    }

    #[test]
    fn message_body_is_trimmed_and_bounded() {
        let c = conversation();
        let m = ChatMessage::compose(&c, c.buyer_id, "  hello  ").unwrap();
        assert_eq!(m.body, "hello");
        assert!(ChatMessage::compose(&c, c.buyer_id, "   ").is_err());
        assert!(ChatMessage::compose(&c, c.buyer_id, &"x".repeat(MAX_MESSAGE_CHARS + 1)).is_err());
    }

    #[test]
    fn outsiders_cannot_send() {
        let c = conversation();
        assert!(ChatMessage::compose(&c, UserId::new(), "hi").is_err());
    }

    #[test]
    fn counterpart_is_other_side() {
        let c = conversation();
        assert_eq!(c.counterpart(&c.buyer_id), c.owner_id);
        assert_eq!(c.counterpart(&c.owner_id), c.buyer_id);
    }

    #[test]
    fn client_frames_parse() {
        let f: ClientFrame = serde_json::from_str(r#"{"type":"send","body":"hi"}"#).unwrap();
        assert_eq!(f, ClientFrame::Send { body: "hi".into() });
        let f: ClientFrame = serde_json::from_str(r#"{"type":"mark_read"}"#).unwrap();
        assert_eq!(f, ClientFrame::MarkRead);
    }

    #[test]
    fn events_are_tagged() {
        let c = conversation();
        let m = ChatMessage::compose(&c, c.owner_id, "hi").unwrap();
        let json = serde_json::to_value(ChatEvent::NewMessage { message: m }).unwrap();
        assert_eq!(json["type"], "new_message");
    }
}
