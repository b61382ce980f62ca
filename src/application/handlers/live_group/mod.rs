//! Live-group handlers.
//!
//! ## Commands
//! - `LockUnitHandler` - Places or refreshes a timed hold on a unit
//! - `ReleaseUnitHandler` - Drops the caller's own hold
//! - `BookUnitHandler` - Converts a live hold into a booking at the group price
//! - `CreateProjectHandler`, `UpdateProjectHandler`, `DeleteProjectHandler` (admin)
//! - `ChangeProjectStatusHandler` (admin)
//! - `SyncHierarchyHandler` - Bulk tower/unit edit with optimistic locking (admin)
//! - `CancelLiveBookingHandler` - Returns a booked unit to sale (admin)
//!
//! ## Queries
//! - `ListProjectsHandler` - Public projects with progress; admins see drafts
//! - `GetProjectHandler` - Project, hierarchy and progress
//! - `MyLiveGroupHandler` - Caller's live holds and bookings
//! - `ListProjectBookingsHandler` - Bookings of one project (admin)

mod book_unit;
mod cancel_booking;
mod change_status;
mod create_project;
mod delete_project;
mod get_project;
mod list_bookings;
mod list_projects;
mod lock_unit;
mod my_live_group;
mod release_unit;
mod sync_hierarchy;
mod update_project;

pub use book_unit::{BookUnitCommand, BookUnitHandler};
pub use cancel_booking::{CancelLiveBookingCommand, CancelLiveBookingHandler};
pub use change_status::{ChangeProjectStatusCommand, ChangeProjectStatusHandler};
pub use create_project::{CreateProjectCommand, CreateProjectHandler};
pub use delete_project::{DeleteProjectCommand, DeleteProjectHandler};
pub use get_project::{GetProjectHandler, GetProjectQuery, ProjectView};
pub use list_bookings::{ListProjectBookingsHandler, ListProjectBookingsQuery};
pub use list_projects::{ListProjectsHandler, ListProjectsQuery, ProjectCard};
pub use lock_unit::{LockUnitCommand, LockUnitHandler};
pub use my_live_group::{MyLiveGroup, MyLiveGroupHandler, MyLiveGroupQuery};
pub use release_unit::{ReleaseUnitCommand, ReleaseUnitHandler};
pub use sync_hierarchy::{SyncHierarchyCommand, SyncHierarchyHandler};
pub use update_project::{UpdateProjectCommand, UpdateProjectHandler};

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, ProjectId};
use crate::domain::live_group::Project;
use crate::ports::ProjectRepository;

pub(crate) async fn load_project(
    projects: &Arc<dyn ProjectRepository>,
    id: &ProjectId,
) -> Result<Project, DomainError> {
    projects
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found(ErrorCode::ProjectNotFound, "Project", id))
}
