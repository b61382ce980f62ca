//! Best-effort transactional email.
//!
//! Handlers render a template and hand it to [`Notifier::dispatch`], which
//! sends on a background task. Delivery failures are logged and never reach
//! the caller.

use std::sync::Arc;

use crate::domain::notification::{Branding, EmailMessage};
use crate::ports::EmailSender;

#[derive(Clone)]
pub struct Notifier {
    sender: Arc<dyn EmailSender>,
    branding: Branding,
    admin_email: Option<String>,
}

impl Notifier {
    pub fn new(sender: Arc<dyn EmailSender>, branding: Branding) -> Self {
        Self {
            sender,
            branding,
            admin_email: None,
        }
    }

    /// Address that receives operational notifications such as new leads.
    pub fn with_admin_email(mut self, admin_email: Option<String>) -> Self {
        self.admin_email = admin_email.filter(|e| !e.trim().is_empty());
        self
    }

    pub fn branding(&self) -> &Branding {
        &self.branding
    }

    pub fn admin_email(&self) -> Option<&str> {
        self.admin_email.as_deref()
    }

    /// Sends `message` on a background task.
    pub fn dispatch(&self, message: EmailMessage) {
        let sender = Arc::clone(&self.sender);
        tokio::spawn(async move {
            deliver(sender.as_ref(), &message).await;
        });
    }
}

async fn deliver(sender: &dyn EmailSender, message: &EmailMessage) {
    match sender.send(message).await {
        Ok(()) => tracing::debug!(subject = %message.subject, "Email sent"),
        Err(e) => tracing::warn!(
            error = %e,
            subject = %message.subject,
            "Email delivery failed"
        ),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::adapters::email::RecordingEmailSender;

    /// Lets spawned deliveries run on the current-thread test runtime.
    pub(crate) async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    pub(crate) fn recording_notifier() -> (Notifier, Arc<RecordingEmailSender>) {
        let sender = Arc::new(RecordingEmailSender::new());
        let notifier = Notifier::new(sender.clone(), Branding::default())
            .with_admin_email(Some("ops@estatehub.test".into()));
        (notifier, sender)
    }

    fn message() -> EmailMessage {
        EmailMessage {
            to: "asha@example.com".into(),
            to_name: None,
            subject: "Hello".into(),
            html: "<p>Hello</p>".into(),
            text: "Hello".into(),
        }
    }

    #[tokio::test]
    async fn dispatch_delivers_in_background() {
        let (notifier, sender) = recording_notifier();
        notifier.dispatch(message());
        settle().await;
        assert_eq!(sender.sent().len(), 1);
    }

    #[tokio::test]
    async fn delivery_failure_is_swallowed() {
        let notifier = Notifier::new(Arc::new(RecordingEmailSender::failing()), Branding::default());
        notifier.dispatch(message());
        settle().await;
    }

    #[test]
    fn blank_admin_email_is_ignored() {
        let notifier = Notifier::new(Arc::new(RecordingEmailSender::new()), Branding::default())
            .with_admin_email(Some("  ".into()));
        assert!(notifier.admin_email().is_none());
    }
}
