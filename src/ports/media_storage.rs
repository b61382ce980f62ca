//! Media upload port.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::foundation::{DomainError, ErrorCode};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredMedia {
    pub url: String,
    pub public_id: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("media storage not configured")]
    NotConfigured,

    #[error("unsupported media type: {0}")]
    UnsupportedType(String),

    #[error("file too large: {size} bytes (max {max})")]
    TooLarge { size: usize, max: usize },

    #[error("media storage error: {0}")]
    Provider(String),
}

impl From<MediaError> for DomainError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::UnsupportedType(_) | MediaError::TooLarge { .. } => {
                DomainError::validation("file", err.to_string())
            }
            other => DomainError::new(ErrorCode::ExternalServiceError, other.to_string()),
        }
    }
}

#[async_trait]
pub trait MediaStorage: Send + Sync {
    async fn upload(
        &self,
        folder: &str,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<StoredMedia, MediaError>;

    async fn delete(&self, public_id: &str) -> Result<(), MediaError>;
}
