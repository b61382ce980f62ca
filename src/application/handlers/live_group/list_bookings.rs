//! ListProjectBookingsHandler - Admin view of a project's bookings.

use std::sync::Arc;

use crate::domain::foundation::{AuthenticatedUser, DomainError, ProjectId};
use crate::domain::live_group::LiveBooking;
use crate::ports::{ProjectRepository, UnitHoldRepository};

use super::load_project;

#[derive(Debug, Clone)]
pub struct ListProjectBookingsQuery {
    pub actor: AuthenticatedUser,
    pub project_id: ProjectId,
}

pub struct ListProjectBookingsHandler {
    projects: Arc<dyn ProjectRepository>,
    units: Arc<dyn UnitHoldRepository>,
}

impl ListProjectBookingsHandler {
    pub fn new(projects: Arc<dyn ProjectRepository>, units: Arc<dyn UnitHoldRepository>) -> Self {
        Self { projects, units }
    }

    pub async fn handle(&self, query: ListProjectBookingsQuery) -> Result<Vec<LiveBooking>, DomainError> {
        query.actor.require_admin()?;
        load_project(&self.projects, &query.project_id).await?;
        self.units.bookings_for_project(&query.project_id).await
    }
}
