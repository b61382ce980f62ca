//! Live-group persistence ports.
//!
//! Hold and booking operations are atomic per unit: implementations load the
//! unit (and the project) under a row lock, apply the domain transition and
//! persist the result before releasing the lock. The domain rules themselves
//! live on [`Unit`]; the adapter only supplies the locking and the count of
//! the caller's other live holds.

use async_trait::async_trait;

use crate::domain::foundation::{
    DomainError, LiveBookingId, ProjectId, Timestamp, UnitId, UserId,
};
use crate::domain::live_group::{
    DesiredTower, Hierarchy, LiveBooking, LiveGroupError, LockPolicy, Project, ProjectProgress,
    SyncPlan, Unit,
};

/// Planner invoked by [`ProjectRepository::sync_hierarchy`] against the
/// freshly locked tree.
pub type SyncPlanner<'a> =
    Box<dyn FnOnce(&Hierarchy) -> Result<SyncPlan, LiveGroupError> + Send + 'a>;

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn create(&self, project: &Project) -> Result<(), DomainError>;

    /// Persists details and status. The version only moves with hierarchy syncs.
    async fn update(&self, project: &Project) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, DomainError>;

    /// Projects visible to buyers (live or closed), newest first.
    async fn list_public(&self) -> Result<Vec<Project>, DomainError>;

    async fn list_all(&self) -> Result<Vec<Project>, DomainError>;

    /// Towers and units ordered by position.
    async fn load_hierarchy(&self, id: &ProjectId) -> Result<Hierarchy, DomainError>;

    /// Unit counts with expired holds counted as available.
    async fn progress(&self, project: &Project, now: Timestamp) -> Result<ProjectProgress, DomainError>;

    /// Applies a bulk tower/unit edit in one transaction.
    ///
    /// The project row is locked and its version compared with
    /// `expected_version` first; a mismatch fails with `VersionConflict`.
    /// The planner then runs against the tree as loaded inside the same
    /// transaction, and its plan is applied. Returns the new version.
    async fn sync_hierarchy(
        &self,
        id: &ProjectId,
        expected_version: i64,
        desired: &[DesiredTower],
        planner: SyncPlanner<'_>,
    ) -> Result<(i64, SyncPlan), DomainError>;

    /// Deletes a project with no confirmed bookings.
    ///
    /// # Errors
    ///
    /// - `Conflict` if any confirmed booking exists
    async fn delete(&self, id: &ProjectId) -> Result<bool, DomainError>;
}

#[async_trait]
pub trait UnitHoldRepository: Send + Sync {
    async fn find_unit(&self, id: &UnitId) -> Result<Option<Unit>, DomainError>;

    /// Places or refreshes a hold for `user`.
    async fn lock_unit(
        &self,
        id: &UnitId,
        user: UserId,
        policy: LockPolicy,
        now: Timestamp,
    ) -> Result<Unit, DomainError>;

    /// Releases the caller's own live hold.
    async fn release_unit(&self, id: &UnitId, user: &UserId, now: Timestamp) -> Result<Unit, DomainError>;

    /// Converts the caller's live hold into a confirmed booking at the group price.
    async fn book_unit(
        &self,
        id: &UnitId,
        user: UserId,
        payment_reference: Option<String>,
        now: Timestamp,
    ) -> Result<LiveBooking, DomainError>;

    /// Clears every hold that lapsed before `now`. Returns the number cleared.
    async fn release_expired_locks(&self, now: Timestamp) -> Result<u64, DomainError>;

    /// The caller's live holds across all projects.
    async fn holds_for_user(&self, user: &UserId, now: Timestamp) -> Result<Vec<Unit>, DomainError>;

    async fn bookings_for_user(&self, user: &UserId) -> Result<Vec<LiveBooking>, DomainError>;

    async fn bookings_for_project(&self, project: &ProjectId) -> Result<Vec<LiveBooking>, DomainError>;

    /// Cancels a confirmed booking and returns its unit to sale.
    async fn cancel_booking(&self, id: &LiveBookingId, now: Timestamp) -> Result<LiveBooking, DomainError>;
}
