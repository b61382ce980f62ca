//! Authentication configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Token and passcode settings
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret (`JWT_SECRET` also works)
    pub jwt_secret: SecretString,

    /// `iss` claim written to and required on every token
    #[serde(default = "default_issuer")]
    pub issuer: String,

    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,

    #[serde(default = "default_otp_ttl_minutes")]
    pub otp_ttl_minutes: i64,

    /// Wrong guesses allowed before a code is burned
    #[serde(default = "default_otp_max_attempts")]
    pub otp_max_attempts: u32,
}

impl AuthConfig {
    /// Validate authentication configuration
    ///
    /// Production requires a secret of at least 32 characters.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        let secret = self.jwt_secret.expose_secret();
        if secret.is_empty() {
            return Err(ValidationError::MissingRequired("JWT_SECRET"));
        }
        if *environment == Environment::Production && secret.len() < 32 {
            return Err(ValidationError::WeakJwtSecret);
        }
        if self.token_ttl_hours <= 0 || self.token_ttl_hours > 24 * 90 {
            return Err(ValidationError::InvalidTokenTtl);
        }
        if self.otp_ttl_minutes <= 0 || self.otp_ttl_minutes > 60 || self.otp_max_attempts == 0 {
            return Err(ValidationError::InvalidOtpSettings);
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: SecretString::new(String::new()),
            issuer: default_issuer(),
            token_ttl_hours: default_token_ttl_hours(),
            otp_ttl_minutes: default_otp_ttl_minutes(),
            otp_max_attempts: default_otp_max_attempts(),
        }
    }
}

fn default_issuer() -> String {
    "estatehub".to_string()
}

fn default_token_ttl_hours() -> i64 {
    168
}

fn default_otp_ttl_minutes() -> i64 {
    10
}

fn default_otp_max_attempts() -> u32 {
    5
}
