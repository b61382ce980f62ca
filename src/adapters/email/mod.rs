//! Email adapters.
//!
//! - `smtp` - lettre SMTP transport
//! - `brevo` - Brevo HTTP API
//! - `log` - Log-only and recording senders

mod brevo;
mod log;
mod smtp;

pub use brevo::BrevoEmailSender;
pub use log::{LogEmailSender, RecordingEmailSender};
pub use smtp::SmtpEmailSender;

use std::sync::Arc;

use crate::config::{EmailConfig, EmailProvider};
use crate::ports::{EmailError, EmailSender};

/// Builds the sender selected by `email.provider`.
pub fn build_email_sender(config: &EmailConfig) -> Result<Arc<dyn EmailSender>, EmailError> {
    Ok(match config.provider {
        EmailProvider::Smtp => Arc::new(SmtpEmailSender::new(config)?),
        EmailProvider::Brevo => Arc::new(BrevoEmailSender::new(config)?),
        EmailProvider::Log => Arc::new(LogEmailSender),
    })
}
