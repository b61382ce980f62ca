//! UpdateLeadHandler - Admin moves a lead through the pipeline.

use std::sync::Arc;

use crate::domain::foundation::{AuthenticatedUser, DomainError, ErrorCode, LeadId};
use crate::domain::marketing::{Lead, LeadStatus};
use crate::ports::LeadRepository;

#[derive(Debug, Clone)]
pub struct UpdateLeadCommand {
    pub actor: AuthenticatedUser,
    pub lead_id: LeadId,
    pub status: Option<LeadStatus>,
    pub notes: Option<String>,
}

pub struct UpdateLeadHandler {
    leads: Arc<dyn LeadRepository>,
}

impl UpdateLeadHandler {
    pub fn new(leads: Arc<dyn LeadRepository>) -> Self {
        Self { leads }
    }

    pub async fn handle(&self, cmd: UpdateLeadCommand) -> Result<Lead, DomainError> {
        cmd.actor.require_admin()?;
        let mut lead = self
            .leads
            .find_by_id(&cmd.lead_id)
            .await?
            .ok_or_else(|| DomainError::not_found(ErrorCode::LeadNotFound, "Lead", cmd.lead_id))?;
        lead.follow_up(cmd.status, cmd.notes.as_deref())?;
        self.leads.update(&lead).await?;
        Ok(lead)
    }
}
