//! SubmitLeadHandler - Captures an enquiry and notifies both sides.

use std::sync::Arc;

use crate::application::Notifier;
use crate::domain::foundation::{DomainError, UserId};
use crate::domain::marketing::{Lead, LeadInput};
use crate::domain::notification::{self, LeadSummary};
use crate::ports::LeadRepository;

#[derive(Debug, Clone)]
pub struct SubmitLeadCommand {
    pub input: LeadInput,
    /// Set when the visitor is signed in.
    pub user_id: Option<UserId>,
}

pub struct SubmitLeadHandler {
    leads: Arc<dyn LeadRepository>,
    notifier: Notifier,
}

impl SubmitLeadHandler {
    pub fn new(leads: Arc<dyn LeadRepository>, notifier: Notifier) -> Self {
        Self { leads, notifier }
    }

    pub async fn handle(&self, cmd: SubmitLeadCommand) -> Result<Lead, DomainError> {
        let lead = Lead::capture(cmd.input, cmd.user_id)?;
        self.leads.create(&lead).await?;
        tracing::info!(lead_id = %lead.id, source = %lead.source, "Lead captured");

        if let Some(email) = &lead.email {
            self.notifier.dispatch(notification::lead_acknowledgement(
                self.notifier.branding(),
                email,
                &lead.name,
            ));
        }
        if let Some(admin) = self.notifier.admin_email() {
            self.notifier.dispatch(notification::lead_admin_notification(
                self.notifier.branding(),
                admin,
                &LeadSummary {
                    name: &lead.name,
                    email: lead.email.as_deref(),
                    phone: lead.phone.as_deref(),
                    source: lead.source.as_str(),
                    interest: lead.interest.as_deref(),
                    message: lead.message.as_deref(),
                },
            ));
        }
        Ok(lead)
    }
}
