//! ListProjectsHandler - Project cards with booking progress.

use std::sync::Arc;

use crate::domain::foundation::{AuthenticatedUser, DomainError, Timestamp};
use crate::domain::live_group::{Project, ProjectProgress};
use crate::ports::ProjectRepository;

#[derive(Debug, Clone, Default)]
pub struct ListProjectsQuery {
    /// Admins listing with this set also see drafts.
    pub include_drafts: bool,
    pub viewer: Option<AuthenticatedUser>,
}

#[derive(Debug, Clone)]
pub struct ProjectCard {
    pub project: Project,
    pub progress: ProjectProgress,
}

pub struct ListProjectsHandler {
    projects: Arc<dyn ProjectRepository>,
}

impl ListProjectsHandler {
    pub fn new(projects: Arc<dyn ProjectRepository>) -> Self {
        Self { projects }
    }

    pub async fn handle(&self, query: ListProjectsQuery) -> Result<Vec<ProjectCard>, DomainError> {
        let projects = if query.include_drafts {
            match &query.viewer {
                Some(viewer) => viewer.require_admin()?,
                None => return Err(DomainError::forbidden("Admin access required")),
            }
            self.projects.list_all().await?
        } else {
            self.projects.list_public().await?
        };

        let now = Timestamp::now();
        let mut cards = Vec::with_capacity(projects.len());
        for project in projects {
            let progress = self.projects.progress(&project, now).await?;
            cards.push(ProjectCard { project, progress });
        }
        Ok(cards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::live_group::fixtures::project;
    use crate::application::handlers::test_support::{admin_user, caller, verified_user};
    use crate::domain::foundation::ErrorCode;
    use crate::domain::live_group::ProjectStatus;

    #[tokio::test]
    async fn public_listing_skips_drafts() {
        let store = InMemoryStore::new();
        let (live, _) = project(&store, ProjectStatus::Live, 2).await;
        project(&store, ProjectStatus::Draft, 1).await;

        let cards = ListProjectsHandler::new(Arc::new(store.clone()))
            .handle(ListProjectsQuery::default())
            .await
            .unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].project.id, live.id);
        assert_eq!(cards[0].progress.total_units, 2);
    }

    #[tokio::test]
    async fn drafts_are_admin_only() {
        let store = InMemoryStore::new();
        let admin = admin_user(&store).await;
        let user = verified_user(&store, "buyer@example.com").await;
        project(&store, ProjectStatus::Draft, 1).await;
        let handler = ListProjectsHandler::new(Arc::new(store.clone()));

        let all = handler
            .handle(ListProjectsQuery {
                include_drafts: true,
                viewer: Some(caller(&admin)),
            })
            .await
            .unwrap();
        assert_eq!(all.len(), 1);

        let err = handler
            .handle(ListProjectsQuery {
                include_drafts: true,
                viewer: Some(caller(&user)),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }
}
