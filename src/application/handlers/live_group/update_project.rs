//! UpdateProjectHandler - Admin edits project details.

use std::sync::Arc;

use crate::domain::foundation::{AuthenticatedUser, DomainError, ProjectId};
use crate::domain::live_group::{Project, ProjectInput};
use crate::ports::ProjectRepository;

use super::load_project;

#[derive(Debug, Clone)]
pub struct UpdateProjectCommand {
    pub actor: AuthenticatedUser,
    pub project_id: ProjectId,
    pub input: ProjectInput,
}

pub struct UpdateProjectHandler {
    projects: Arc<dyn ProjectRepository>,
}

impl UpdateProjectHandler {
    pub fn new(projects: Arc<dyn ProjectRepository>) -> Self {
        Self { projects }
    }

    /// Changing the discount affects future bookings only; confirmed
    /// bookings keep the amount they were booked at.
    pub async fn handle(&self, cmd: UpdateProjectCommand) -> Result<Project, DomainError> {
        cmd.actor.require_admin()?;
        let details = cmd.input.validate()?;
        let mut project = load_project(&self.projects, &cmd.project_id).await?;
        project.edit(details);
        self.projects.update(&project).await?;

        tracing::info!(project_id = %project.id, admin_id = %cmd.actor.id, "Project updated");
        Ok(project)
    }
}
