//! DeleteProjectHandler - Admin removes a project without bookings.

use std::sync::Arc;

use crate::domain::foundation::{AuthenticatedUser, DomainError, ErrorCode, ProjectId};
use crate::ports::ProjectRepository;

#[derive(Debug, Clone)]
pub struct DeleteProjectCommand {
    pub actor: AuthenticatedUser,
    pub project_id: ProjectId,
}

pub struct DeleteProjectHandler {
    projects: Arc<dyn ProjectRepository>,
}

impl DeleteProjectHandler {
    pub fn new(projects: Arc<dyn ProjectRepository>) -> Self {
        Self { projects }
    }

    pub async fn handle(&self, cmd: DeleteProjectCommand) -> Result<(), DomainError> {
        cmd.actor.require_admin()?;
        if !self.projects.delete(&cmd.project_id).await? {
            return Err(DomainError::not_found(
                ErrorCode::ProjectNotFound,
                "Project",
                cmd.project_id,
            ));
        }
        tracing::info!(project_id = %cmd.project_id, admin_id = %cmd.actor.id, "Project deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::live_group::fixtures::project;
    use crate::application::handlers::test_support::{admin_user, caller};
    use crate::domain::foundation::{Timestamp, UserId};
    use crate::domain::live_group::{LockPolicy, ProjectStatus};
    use crate::ports::UnitHoldRepository;

    #[tokio::test]
    async fn project_without_bookings_is_deleted() {
        let store = InMemoryStore::new();
        let admin = admin_user(&store).await;
        let (p, _) = project(&store, ProjectStatus::Live, 2).await;

        DeleteProjectHandler::new(Arc::new(store.clone()))
            .handle(DeleteProjectCommand {
                actor: caller(&admin),
                project_id: p.id,
            })
            .await
            .unwrap();
        assert!(store.find_by_id(&p.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn booked_project_is_kept() {
        let store = InMemoryStore::new();
        let admin = admin_user(&store).await;
        let (p, units) = project(&store, ProjectStatus::Live, 1).await;
        let buyer = UserId::new();
        let now = Timestamp::now();
        store.lock_unit(&units[0].id, buyer, LockPolicy::default(), now).await.unwrap();
        store.book_unit(&units[0].id, buyer, None, now).await.unwrap();

        let err = DeleteProjectHandler::new(Arc::new(store.clone()))
            .handle(DeleteProjectCommand {
                actor: caller(&admin),
                project_id: p.id,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
    }
}
