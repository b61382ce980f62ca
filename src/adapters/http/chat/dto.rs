//! HTTP DTOs for chat.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::PropertyId;

#[derive(Debug, Clone, Deserialize)]
pub struct StartConversationRequest {
    pub property_id: PropertyId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageRequest {
    pub body: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarkReadResponse {
    pub marked: u64,
}
