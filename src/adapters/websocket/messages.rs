//! Control frames sent from server to chat clients.
//!
//! Chat events themselves go out as the serialized
//! [`ChatEvent`](crate::domain::chat::ChatEvent) (`new_message`, `read`);
//! the frames here cover the connection itself. Inbound frames are
//! [`ClientFrame`](crate::domain::chat::ClientFrame).

use serde::Serialize;

use crate::domain::foundation::{ConversationId, Timestamp};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerFrame {
    /// Socket joined the conversation room.
    Connected {
        conversation_id: ConversationId,
        client_id: String,
        timestamp: Timestamp,
    },

    /// Reply to a client `ping`.
    Pong { timestamp: Timestamp },

    /// A client frame could not be processed. The socket stays open.
    Error { code: String, message: String },
}

impl ServerFrame {
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        ServerFrame::Error {
            code: code.into(),
            message: message.into(),
        }
    }
}
