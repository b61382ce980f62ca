//! Email configuration

use secrecy::SecretString;
use serde::Deserialize;

use super::error::ValidationError;

/// Which transport delivers outgoing mail
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmailProvider {
    Smtp,
    Brevo,
    /// Log the rendered message instead of sending it
    #[default]
    Log,
}

/// Email configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    #[serde(default)]
    pub provider: EmailProvider,

    #[serde(default = "default_from_email")]
    pub from_email: String,

    #[serde(default = "default_from_name")]
    pub from_name: String,

    pub smtp_host: Option<String>,

    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    pub smtp_username: Option<String>,

    pub smtp_password: Option<SecretString>,

    pub brevo_api_key: Option<SecretString>,

    /// Receives new-lead notifications; unset disables them
    pub admin_email: Option<String>,

    /// Base URL used for links in templates
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,
}

impl EmailConfig {
    /// Get formatted "From" header value
    pub fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }

    /// Validate email configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.from_email.contains('@') {
            return Err(ValidationError::InvalidFromEmail);
        }
        match self.provider {
            EmailProvider::Smtp if self.smtp_host.as_deref().unwrap_or("").is_empty() => {
                Err(ValidationError::MissingRequired("SMTP_HOST"))
            }
            EmailProvider::Brevo if self.brevo_api_key.is_none() => {
                Err(ValidationError::MissingRequired("BREVO_API_KEY"))
            }
            _ => Ok(()),
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            provider: EmailProvider::default(),
            from_email: default_from_email(),
            from_name: default_from_name(),
            smtp_host: None,
            smtp_port: default_smtp_port(),
            smtp_username: None,
            smtp_password: None,
            brevo_api_key: None,
            admin_email: None,
            frontend_url: default_frontend_url(),
        }
    }
}

fn default_from_email() -> String {
    "noreply@estatehub.in".to_string()
}

fn default_from_name() -> String {
    "EstateHub".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_frontend_url() -> String {
    "http://localhost:5173".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_config_defaults() {
        let config = EmailConfig::default();
        assert_eq!(config.provider, EmailProvider::Log);
        assert_eq!(config.from_header(), "EstateHub <noreply@estatehub.in>");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_smtp_requires_host() {
        let config = EmailConfig {
            provider: EmailProvider::Smtp,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("SMTP_HOST"))
        );
    }

    #[test]
    fn test_brevo_requires_key() {
        let config = EmailConfig {
            provider: EmailProvider::Brevo,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = EmailConfig {
            provider: EmailProvider::Brevo,
            brevo_api_key: Some(SecretString::new("xkeysib-123".to_string())),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_from_email() {
        let config = EmailConfig {
            from_email: "invalid-email".to_string(),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidFromEmail));
    }
}
