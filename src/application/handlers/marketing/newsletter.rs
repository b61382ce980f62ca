//! NewsletterHandler - Subscribe and unsubscribe by email.

use std::sync::Arc;

use crate::domain::foundation::DomainError;
use crate::domain::marketing::newsletter_email;
use crate::ports::LeadRepository;

#[derive(Debug, Clone)]
pub enum NewsletterCommand {
    Subscribe { email: String },
    Unsubscribe { email: String },
}

pub struct NewsletterHandler {
    leads: Arc<dyn LeadRepository>,
}

impl NewsletterHandler {
    pub fn new(leads: Arc<dyn LeadRepository>) -> Self {
        Self { leads }
    }

    /// Returns whether the subscription state changed.
    pub async fn handle(&self, cmd: NewsletterCommand) -> Result<bool, DomainError> {
        match cmd {
            NewsletterCommand::Subscribe { email } => {
                let email = newsletter_email(&email)?;
                self.leads.subscribe(&email).await
            }
            NewsletterCommand::Unsubscribe { email } => {
                let email = newsletter_email(&email)?;
                self.leads.unsubscribe(&email).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::foundation::ErrorCode;

    #[tokio::test]
    async fn addresses_are_normalized() {
        let handler = NewsletterHandler::new(Arc::new(InMemoryStore::new()));

        assert!(handler
            .handle(NewsletterCommand::Subscribe {
                email: " Priya@Example.com ".into()
            })
            .await
            .unwrap());
        assert!(!handler
            .handle(NewsletterCommand::Subscribe {
                email: "priya@example.com".into()
            })
            .await
            .unwrap());
        assert!(handler
            .handle(NewsletterCommand::Unsubscribe {
                email: "PRIYA@example.com".into()
            })
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn malformed_address_is_rejected() {
        let handler = NewsletterHandler::new(Arc::new(InMemoryStore::new()));
        let err = handler
            .handle(NewsletterCommand::Subscribe {
                email: "not-an-email".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}
