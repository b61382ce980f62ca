//! Redis configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Redis backs the shared rate limiter. Without a URL the limiter stays in memory.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RedisConfig {
    /// Redis connection URL (`REDIS_URL` also works)
    pub url: Option<String>,
}

impl RedisConfig {
    /// The URL, if one is configured and non-empty
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.is_empty())
    }

    /// Validate Redis configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.url() {
            Some(url) if !url.starts_with("redis://") && !url.starts_with("rediss://") => {
                Err(ValidationError::InvalidRedisUrl)
            }
            _ => Ok(()),
        }
    }
}
