//! Cloudinary signed uploads.
//!
//! Requests are signed with SHA-256 over the alphabetically sorted parameters
//! followed by the API secret.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::config::StorageConfig;
use crate::domain::foundation::Timestamp;
use crate::ports::{MediaError, MediaStorage, StoredMedia};

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

pub struct CloudinaryStorage {
    cloud_name: String,
    api_key: String,
    api_secret: SecretString,
    http_client: reqwest::Client,
}

impl CloudinaryStorage {
    pub fn new(config: &StorageConfig) -> Result<Self, MediaError> {
        let cloud_name = config.cloudinary_cloud_name.clone().ok_or(MediaError::NotConfigured)?;
        let api_key = config.cloudinary_api_key.clone().ok_or(MediaError::NotConfigured)?;
        let api_secret = config.cloudinary_api_secret.clone().ok_or(MediaError::NotConfigured)?;
        Ok(Self {
            cloud_name,
            api_key,
            api_secret,
            http_client: reqwest::Client::new(),
        })
    }

    fn endpoint(&self, action: &str) -> String {
        format!("https://api.cloudinary.com/v1_1/{}/image/{}", self.cloud_name, action)
    }

    fn sign(&self, params: &[(&str, String)]) -> String {
        sign_params(params, self.api_secret.expose_secret())
    }
}

/// Hex SHA-256 of `k1=v1&k2=v2...` (sorted by key) with the secret appended.
pub(crate) fn sign_params(params: &[(&str, String)], secret: &str) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");
    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl MediaStorage for CloudinaryStorage {
    async fn upload(
        &self,
        folder: &str,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<StoredMedia, MediaError> {
        let timestamp = Timestamp::now().as_unix_secs().to_string();
        let signed = [("folder", folder.to_string()), ("timestamp", timestamp.clone())];
        let signature = self.sign(&signed);

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)
            .map_err(|_| MediaError::UnsupportedType(content_type.to_string()))?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("api_key", self.api_key.clone())
            .text("folder", folder.to_string())
            .text("timestamp", timestamp)
            .text("signature_algorithm", "sha256")
            .text("signature", signature);

        let response = self
            .http_client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| MediaError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(error = %error_text, "Cloudinary upload failed");
            return Err(MediaError::Provider(format!("Cloudinary API error: {}", error_text)));
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|e| MediaError::Provider(format!("Failed to parse Cloudinary response: {}", e)))?;
        Ok(StoredMedia {
            url: uploaded.secure_url,
            public_id: uploaded.public_id,
        })
    }

    async fn delete(&self, public_id: &str) -> Result<(), MediaError> {
        let timestamp = Timestamp::now().as_unix_secs().to_string();
        let signed = [("public_id", public_id.to_string()), ("timestamp", timestamp.clone())];
        let signature = self.sign(&signed);

        let params = [
            ("public_id", public_id.to_string()),
            ("timestamp", timestamp),
            ("api_key", self.api_key.clone()),
            ("signature_algorithm", "sha256".to_string()),
            ("signature", signature),
        ];
        let response = self
            .http_client
            .post(self.endpoint("destroy"))
            .form(&params)
            .send()
            .await
            .map_err(|e| MediaError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(MediaError::Provider(format!("Cloudinary API error: {}", error_text)));
        }
        let destroyed: DestroyResponse = response
            .json()
            .await
            .map_err(|e| MediaError::Provider(format!("Failed to parse Cloudinary response: {}", e)))?;
        match destroyed.result.as_str() {
            "ok" | "not found" => Ok(()),
            other => Err(MediaError::Provider(format!("Cloudinary destroy returned {}", other))),
        }
    }
}
