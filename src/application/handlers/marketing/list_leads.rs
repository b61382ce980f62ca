//! ListLeadsHandler - Admin lead inbox.

use std::sync::Arc;

use crate::domain::foundation::{AuthenticatedUser, DomainError, Page, PageRequest};
use crate::domain::marketing::Lead;
use crate::ports::{LeadFilter, LeadRepository};

#[derive(Debug, Clone)]
pub struct ListLeadsQuery {
    pub actor: AuthenticatedUser,
    pub filter: LeadFilter,
    pub page: PageRequest,
}

pub struct ListLeadsHandler {
    leads: Arc<dyn LeadRepository>,
}

impl ListLeadsHandler {
    pub fn new(leads: Arc<dyn LeadRepository>) -> Self {
        Self { leads }
    }

    pub async fn handle(&self, query: ListLeadsQuery) -> Result<Page<Lead>, DomainError> {
        query.actor.require_admin()?;
        self.leads.list(&query.filter, query.page).await
    }
}
