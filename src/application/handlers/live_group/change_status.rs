//! ChangeProjectStatusHandler - Admin opens or closes a project.

use std::sync::Arc;

use crate::domain::foundation::{AuthenticatedUser, DomainError, ProjectId};
use crate::domain::live_group::{Project, ProjectStatus};
use crate::ports::ProjectRepository;

use super::load_project;

#[derive(Debug, Clone)]
pub struct ChangeProjectStatusCommand {
    pub actor: AuthenticatedUser,
    pub project_id: ProjectId,
    pub status: ProjectStatus,
}

pub struct ChangeProjectStatusHandler {
    projects: Arc<dyn ProjectRepository>,
}

impl ChangeProjectStatusHandler {
    pub fn new(projects: Arc<dyn ProjectRepository>) -> Self {
        Self { projects }
    }

    pub async fn handle(&self, cmd: ChangeProjectStatusCommand) -> Result<Project, DomainError> {
        cmd.actor.require_admin()?;
        let mut project = load_project(&self.projects, &cmd.project_id).await?;
        let from = project.status;
        project.change_status(cmd.status)?;
        self.projects.update(&project).await?;

        tracing::info!(
            project_id = %project.id,
            from = %from,
            to = %project.status,
            "Project status changed"
        );
        Ok(project)
    }
}
