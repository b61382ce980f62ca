//! Media storage configuration

use secrecy::SecretString;
use serde::Deserialize;

use super::error::ValidationError;

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageProvider {
    Cloudinary,
    /// Returns placeholder URLs without uploading
    #[default]
    Mock,
}

/// Upload configuration (Cloudinary)
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub provider: StorageProvider,

    pub cloudinary_cloud_name: Option<String>,

    pub cloudinary_api_key: Option<String>,

    pub cloudinary_api_secret: Option<SecretString>,

    /// Per-file limit in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl StorageConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_upload_bytes == 0 || self.max_upload_bytes > 50 * 1024 * 1024 {
            return Err(ValidationError::InvalidUploadLimit);
        }
        if self.provider == StorageProvider::Cloudinary {
            if self.cloudinary_cloud_name.as_deref().unwrap_or("").is_empty() {
                return Err(ValidationError::MissingRequired("CLOUDINARY_CLOUD_NAME"));
            }
            if self.cloudinary_api_key.as_deref().unwrap_or("").is_empty() {
                return Err(ValidationError::MissingRequired("CLOUDINARY_API_KEY"));
            }
            if self.cloudinary_api_secret.is_none() {
                return Err(ValidationError::MissingRequired("CLOUDINARY_API_SECRET"));
            }
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: StorageProvider::default(),
            cloudinary_cloud_name: None,
            cloudinary_api_key: None,
            cloudinary_api_secret: None,
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_max_upload_bytes() -> usize {
    5 * 1024 * 1024
}
