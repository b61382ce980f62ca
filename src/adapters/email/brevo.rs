//! Brevo transactional email API.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::info;

use crate::config::EmailConfig;
use crate::domain::notification::EmailMessage;
use crate::ports::{EmailError, EmailSender};

const BREVO_SEND_URL: &str = "https://api.brevo.com/v3/smtp/email";

#[derive(Serialize)]
struct Contact<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendRequest<'a> {
    sender: Contact<'a>,
    to: Vec<Contact<'a>>,
    subject: &'a str,
    html_content: &'a str,
    text_content: &'a str,
}

pub struct BrevoEmailSender {
    client: reqwest::Client,
    api_key: SecretString,
    from_email: String,
    from_name: String,
}

impl BrevoEmailSender {
    pub fn new(config: &EmailConfig) -> Result<Self, EmailError> {
        let api_key = config
            .brevo_api_key
            .clone()
            .ok_or_else(|| EmailError::Provider("BREVO_API_KEY not set".to_string()))?;
        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            from_email: config.from_email.clone(),
            from_name: config.from_name.clone(),
        })
    }
}

#[async_trait]
impl EmailSender for BrevoEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailError> {
        let body = SendRequest {
            sender: Contact {
                email: &self.from_email,
                name: Some(&self.from_name),
            },
            to: vec![Contact {
                email: &message.to,
                name: message.to_name.as_deref(),
            }],
            subject: &message.subject,
            html_content: &message.html,
            text_content: &message.text,
        };

        let response = self
            .client
            .post(BREVO_SEND_URL)
            .header("api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| EmailError::Provider(format!("Brevo request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(EmailError::Provider(format!("Brevo returned {}: {}", status, detail)));
        }
        info!(subject = %message.subject, "email sent via Brevo");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_uses_brevo_field_names() {
        let body = SendRequest {
            sender: Contact {
                email: "noreply@estatehub.in",
                name: Some("EstateHub"),
            },
            to: vec![Contact {
                email: "a@example.com",
                name: None,
            }],
            subject: "Hi",
            html_content: "<p>Hi</p>",
            text_content: "Hi",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["htmlContent"], "<p>Hi</p>");
        assert_eq!(json["textContent"], "Hi");
        assert!(json["to"][0].get("name").is_none());
    }

    #[test]
    fn requires_api_key() {
        assert!(BrevoEmailSender::new(&EmailConfig::default()).is_err());
    }
}
