//! HTTP DTOs for uploads.

use serde::{Deserialize, Serialize};

use crate::ports::StoredMedia;

#[derive(Debug, Clone, Serialize)]
pub struct UploadResponse {
    pub files: Vec<StoredMedia>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteImageRequest {
    pub public_id: String,
}
