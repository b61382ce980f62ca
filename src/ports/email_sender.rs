//! Outbound email port.

use async_trait::async_trait;

use crate::domain::notification::EmailMessage;

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("email provider error: {0}")]
    Provider(String),
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailError>;
}
