//! SMTP delivery via lettre.

use async_trait::async_trait;
use lettre::message::{header, Mailbox, Message, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use secrecy::ExposeSecret;
use tracing::info;

use crate::config::EmailConfig;
use crate::domain::notification::EmailMessage;
use crate::ports::{EmailError, EmailSender};

/// STARTTLS relay with optional credentials.
pub struct SmtpEmailSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpEmailSender {
    pub fn new(config: &EmailConfig) -> Result<Self, EmailError> {
        let from = config
            .from_header()
            .parse::<Mailbox>()
            .map_err(|e| EmailError::InvalidAddress(format!("from address: {}", e)))?;
        let host = config.smtp_host.as_deref().unwrap_or_default();

        let builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| EmailError::Provider(format!("failed to configure SMTP transport: {}", e)))?
            .port(config.smtp_port);
        let builder = match (&config.smtp_username, &config.smtp_password) {
            (Some(user), Some(password)) => builder.credentials(Credentials::new(
                user.clone(),
                password.expose_secret().clone(),
            )),
            _ => builder,
        };

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailError> {
        let to = match &message.to_name {
            Some(name) => format!("{} <{}>", name, message.to),
            None => message.to.clone(),
        };
        let to = to
            .parse::<Mailbox>()
            .or_else(|_| message.to.parse::<Mailbox>())
            .map_err(|e| EmailError::InvalidAddress(format!("{}: {}", message.to, e)))?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(message.subject.clone())
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(message.text.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(message.html.clone()),
                    ),
            )
            .map_err(|e| EmailError::Provider(format!("failed to build message: {}", e)))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| EmailError::Provider(format!("SMTP send failed: {}", e)))?;
        info!(subject = %message.subject, "email sent via SMTP");
        Ok(())
    }
}
