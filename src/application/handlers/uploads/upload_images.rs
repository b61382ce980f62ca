//! UploadImagesHandler - Validates image parts and hands them to storage.
//!
//! The declared content type must agree with the file's leading bytes, so a
//! renamed executable is refused before it reaches the storage provider.

use std::str::FromStr;
use std::sync::Arc;

use crate::domain::foundation::{DomainError, UserId, ValidationError};
use crate::ports::{MediaError, MediaStorage, StoredMedia};

pub const MAX_FILES_PER_REQUEST: usize = 10;

/// Destination folders clients may choose from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadFolder {
    #[default]
    Properties,
    Projects,
    Stays,
    Avatars,
}

impl UploadFolder {
    pub fn path(&self) -> &'static str {
        match self {
            UploadFolder::Properties => "estatehub/properties",
            UploadFolder::Projects => "estatehub/projects",
            UploadFolder::Stays => "estatehub/stays",
            UploadFolder::Avatars => "estatehub/avatars",
        }
    }
}

impl FromStr for UploadFolder {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "properties" => Ok(UploadFolder::Properties),
            "projects" => Ok(UploadFolder::Projects),
            "stays" => Ok(UploadFolder::Stays),
            "avatars" => Ok(UploadFolder::Avatars),
            _ => Err(ValidationError::invalid_format(
                "folder",
                "expected one of properties, projects, stays, avatars",
            )),
        }
    }
}

/// One multipart file part.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct UploadImagesCommand {
    pub user_id: UserId,
    pub folder: UploadFolder,
    pub files: Vec<ImageFile>,
}

pub struct UploadImagesHandler {
    storage: Arc<dyn MediaStorage>,
    max_bytes: usize,
}

impl UploadImagesHandler {
    pub fn new(storage: Arc<dyn MediaStorage>, max_bytes: usize) -> Self {
        Self { storage, max_bytes }
    }

    pub async fn handle(&self, cmd: UploadImagesCommand) -> Result<Vec<StoredMedia>, DomainError> {
        // 1. Request shape
        if cmd.files.is_empty() {
            return Err(DomainError::validation("file", "Attach at least one image"));
        }
        if cmd.files.len() > MAX_FILES_PER_REQUEST {
            return Err(DomainError::validation(
                "file",
                format!("At most {} images per request", MAX_FILES_PER_REQUEST),
            ));
        }

        // 2. Every file is checked before any is stored
        for file in &cmd.files {
            self.check(file)?;
        }

        // 3. Upload in order
        let mut stored = Vec::with_capacity(cmd.files.len());
        for file in cmd.files {
            let media = self
                .storage
                .upload(cmd.folder.path(), &file.file_name, &file.content_type, file.bytes)
                .await?;
            stored.push(media);
        }

        tracing::info!(user_id = %cmd.user_id, count = stored.len(), folder = cmd.folder.path(), "Images uploaded");
        Ok(stored)
    }

    fn check(&self, file: &ImageFile) -> Result<(), MediaError> {
        if file.bytes.len() > self.max_bytes {
            return Err(MediaError::TooLarge {
                size: file.bytes.len(),
                max: self.max_bytes,
            });
        }
        let declared = file.content_type.trim().to_ascii_lowercase();
        match sniff_image(&file.bytes) {
            Some(actual) if actual == declared || (actual == "image/jpeg" && declared == "image/jpg") => {
                Ok(())
            }
            _ => Err(MediaError::UnsupportedType(declared)),
        }
    }
}

/// Detects JPEG, PNG and WebP from their signatures.
fn sniff_image(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        Some("image/png")
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else {
        None
    }
}
