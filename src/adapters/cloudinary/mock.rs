//! Placeholder storage that keeps uploads in memory.

use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::ports::{MediaError, MediaStorage, StoredMedia};

#[derive(Debug, Default)]
pub struct MockMediaStorage {
    stored: Mutex<Vec<StoredMedia>>,
}

impl MockMediaStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stored(&self) -> Vec<StoredMedia> {
        self.stored.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl MediaStorage for MockMediaStorage {
    async fn upload(
        &self,
        folder: &str,
        _file_name: &str,
        _content_type: &str,
        _bytes: Vec<u8>,
    ) -> Result<StoredMedia, MediaError> {
        let public_id = format!("{}/{}", folder, Uuid::new_v4());
        let media = StoredMedia {
            url: format!("https://media.example.invalid/{}", public_id),
            public_id,
        };
        if let Ok(mut stored) = self.stored.lock() {
            stored.push(media.clone());
        }
        Ok(media)
    }

    async fn delete(&self, public_id: &str) -> Result<(), MediaError> {
        if let Ok(mut stored) = self.stored.lock() {
            stored.retain(|m| m.public_id != public_id);
        }
        Ok(())
    }
}
