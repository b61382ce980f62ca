//! GetProjectHandler - Project with its full tower/unit tree.

use std::sync::Arc;

use crate::domain::foundation::{AuthenticatedUser, DomainError, ErrorCode, ProjectId, Timestamp};
use crate::domain::live_group::{Hierarchy, Project, ProjectProgress};
use crate::ports::ProjectRepository;

use super::load_project;

#[derive(Debug, Clone)]
pub struct GetProjectQuery {
    pub project_id: ProjectId,
    pub viewer: Option<AuthenticatedUser>,
}

#[derive(Debug, Clone)]
pub struct ProjectView {
    pub project: Project,
    pub hierarchy: Hierarchy,
    pub progress: ProjectProgress,
}

pub struct GetProjectHandler {
    projects: Arc<dyn ProjectRepository>,
}

impl GetProjectHandler {
    pub fn new(projects: Arc<dyn ProjectRepository>) -> Self {
        Self { projects }
    }

    /// Draft projects are only visible to admins.
    pub async fn handle(&self, query: GetProjectQuery) -> Result<ProjectView, DomainError> {
        let project = load_project(&self.projects, &query.project_id).await?;
        let is_admin = query.viewer.as_ref().map(|v| v.is_admin()).unwrap_or(false);
        if !project.status.is_public() && !is_admin {
            return Err(DomainError::not_found(
                ErrorCode::ProjectNotFound,
                "Project",
                project.id,
            ));
        }

        let hierarchy = self.projects.load_hierarchy(&project.id).await?;
        let progress = self.projects.progress(&project, Timestamp::now()).await?;
        Ok(ProjectView {
            project,
            hierarchy,
            progress,
        })
    }
}
