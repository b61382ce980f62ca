//! SyncHierarchyHandler - Bulk tower/unit edit for a project.
//!
//! The desired tree is validated up front, then handed to the repository
//! together with a planner closure. The repository compares versions, locks
//! the current tree and runs the planner inside its transaction, so the
//! booking-protection check always sees committed holds and bookings.

use std::sync::Arc;

use crate::domain::foundation::{AuthenticatedUser, DomainError, ProjectId, Timestamp};
use crate::domain::live_group::{plan_sync, validate_desired, DesiredTower, SyncOutcome};
use crate::ports::ProjectRepository;

use super::load_project;

#[derive(Debug, Clone)]
pub struct SyncHierarchyCommand {
    pub actor: AuthenticatedUser,
    pub project_id: ProjectId,
    pub expected_version: i64,
    pub towers: Vec<DesiredTower>,
}

pub struct SyncHierarchyHandler {
    projects: Arc<dyn ProjectRepository>,
}

impl SyncHierarchyHandler {
    pub fn new(projects: Arc<dyn ProjectRepository>) -> Self {
        Self { projects }
    }

    pub async fn handle(&self, cmd: SyncHierarchyCommand) -> Result<SyncOutcome, DomainError> {
        cmd.actor.require_admin()?;

        // 1. Shape checks that need no database state
        validate_desired(&cmd.towers)?;
        load_project(&self.projects, &cmd.project_id).await?;

        // 2. Version check, diff, protection check and apply in one transaction
        let now = Timestamp::now();
        let desired = cmd.towers;
        let planned = desired.clone();
        let (version, plan) = self
            .projects
            .sync_hierarchy(
                &cmd.project_id,
                cmd.expected_version,
                &desired,
                Box::new(move |current| plan_sync(current, &planned, now)),
            )
            .await?;

        let changes = plan.counts();
        tracing::info!(
            project_id = %cmd.project_id,
            admin_id = %cmd.actor.id,
            version,
            towers_created = changes.towers_created,
            towers_deleted = changes.towers_deleted,
            units_created = changes.units_created,
            units_updated = changes.units_updated,
            units_deleted = changes.units_deleted,
            "Hierarchy synced"
        );
        Ok(SyncOutcome { version, changes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::live_group::fixtures::{project, tower};
    use crate::application::handlers::test_support::{admin_user, caller};
    use crate::domain::foundation::{ErrorCode, UserId};
    use crate::domain::live_group::{DesiredUnit, LockPolicy, ProjectStatus, Unit};
    use crate::ports::UnitHoldRepository;

    fn keep(unit: &Unit) -> DesiredUnit {
        DesiredUnit {
            id: Some(unit.id),
            unit_number: unit.unit_number.clone(),
            floor: unit.floor,
            unit_type: unit.unit_type.clone(),
            carpet_area_sqft: unit.carpet_area_sqft,
            price: unit.price,
            blocked: false,
        }
    }

    async fn current_tower(store: &InMemoryStore, id: &ProjectId) -> DesiredTower {
        let hierarchy = store.load_hierarchy(id).await.unwrap();
        let t = &hierarchy.towers[0];
        DesiredTower {
            id: Some(t.tower.id),
            name: t.tower.name.clone(),
            total_floors: t.tower.total_floors,
            units: t.units.iter().map(keep).collect(),
        }
    }

    #[tokio::test]
    async fn adds_tower_and_bumps_version() {
        let store = InMemoryStore::new();
        let admin = admin_user(&store).await;
        let (p, _) = project(&store, ProjectStatus::Live, 2).await;
        let existing = current_tower(&store, &p.id).await;

        let outcome = SyncHierarchyHandler::new(Arc::new(store.clone()))
            .handle(SyncHierarchyCommand {
                actor: caller(&admin),
                project_id: p.id,
                expected_version: p.version,
                towers: vec![existing, tower("Tower B", 3)],
            })
            .await
            .unwrap();

        assert_eq!(outcome.version, p.version + 1);
        assert_eq!(outcome.changes.towers_created, 1);
        assert_eq!(outcome.changes.units_created, 3);
        assert_eq!(outcome.changes.units_deleted, 0);
        assert_eq!(store.load_hierarchy(&p.id).await.unwrap().towers.len(), 2);
    }

    #[tokio::test]
    async fn stale_version_conflicts() {
        let store = InMemoryStore::new();
        let admin = admin_user(&store).await;
        let (p, _) = project(&store, ProjectStatus::Live, 1).await;

        let err = SyncHierarchyHandler::new(Arc::new(store.clone()))
            .handle(SyncHierarchyCommand {
                actor: caller(&admin),
                project_id: p.id,
                expected_version: p.version - 1,
                towers: vec![],
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::VersionConflict);
    }

    #[tokio::test]
    async fn held_unit_cannot_be_removed() {
        let store = InMemoryStore::new();
        let admin = admin_user(&store).await;
        let (p, units) = project(&store, ProjectStatus::Live, 2).await;
        store
            .lock_unit(&units[0].id, UserId::new(), LockPolicy::default(), Timestamp::now())
            .await
            .unwrap();
        let mut trimmed = current_tower(&store, &p.id).await;
        trimmed.units.retain(|u| u.id != Some(units[0].id));

        let err = SyncHierarchyHandler::new(Arc::new(store.clone()))
            .handle(SyncHierarchyCommand {
                actor: caller(&admin),
                project_id: p.id,
                expected_version: p.version,
                towers: vec![trimmed],
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ProtectedUnits);
        assert_eq!(err.details.get("unit_ids"), Some(&units[0].id.to_string()));

        let after = store.find_by_id(&p.id).await.unwrap().unwrap();
        assert_eq!(after.version, p.version);
    }

    #[tokio::test]
    async fn duplicate_tower_names_fail_validation() {
        let store = InMemoryStore::new();
        let admin = admin_user(&store).await;
        let (p, _) = project(&store, ProjectStatus::Draft, 0).await;

        let err = SyncHierarchyHandler::new(Arc::new(store.clone()))
            .handle(SyncHierarchyCommand {
                actor: caller(&admin),
                project_id: p.id,
                expected_version: p.version,
                towers: vec![tower("Tower A", 1), tower("tower a", 1)],
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}
