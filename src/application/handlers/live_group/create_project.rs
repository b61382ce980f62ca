//! CreateProjectHandler - Admin creates a draft project.

use std::sync::Arc;

use crate::domain::foundation::{AuthenticatedUser, DomainError};
use crate::domain::live_group::{Project, ProjectInput};
use crate::ports::ProjectRepository;

#[derive(Debug, Clone)]
pub struct CreateProjectCommand {
    pub actor: AuthenticatedUser,
    pub input: ProjectInput,
}

pub struct CreateProjectHandler {
    projects: Arc<dyn ProjectRepository>,
}

impl CreateProjectHandler {
    pub fn new(projects: Arc<dyn ProjectRepository>) -> Self {
        Self { projects }
    }

    pub async fn handle(&self, cmd: CreateProjectCommand) -> Result<Project, DomainError> {
        cmd.actor.require_admin()?;
        let project = Project::create(cmd.input.validate()?);
        self.projects.create(&project).await?;

        tracing::info!(project_id = %project.id, admin_id = %cmd.actor.id, "Project created");
        Ok(project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::test_support::{admin_user, caller, verified_user};
    use crate::domain::foundation::ErrorCode;
    use crate::domain::live_group::{sample_project_input, ProjectStatus};

    #[tokio::test]
    async fn admin_creates_draft() {
        let store = InMemoryStore::new();
        let admin = admin_user(&store).await;

        let project = CreateProjectHandler::new(Arc::new(store.clone()))
            .handle(CreateProjectCommand {
                actor: caller(&admin),
                input: sample_project_input(),
            })
            .await
            .unwrap();
        assert_eq!(project.status, ProjectStatus::Draft);
        assert_eq!(project.version, 1);
        assert!(store.find_by_id(&project.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn regular_user_is_forbidden() {
        let store = InMemoryStore::new();
        let user = verified_user(&store, "buyer@example.com").await;

        let err = CreateProjectHandler::new(Arc::new(store.clone()))
            .handle(CreateProjectCommand {
                actor: caller(&user),
                input: sample_project_input(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }
}
