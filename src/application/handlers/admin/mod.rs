//! Admin console handlers. Every handler requires the admin role.
//!
//! ## Commands
//! - `ChangeUserRoleHandler` - Promote or demote an account
//! - `DeleteUserHandler` - Same cascade as self-service deletion
//!
//! ## Queries
//! - `DashboardStatsHandler` - Headline counts
//! - `ListUsersHandler` - Search accounts
//! - `ListPropertiesByStatusHandler` - Moderation queue

mod change_role;
mod dashboard_stats;
mod delete_user;
mod list_properties;
mod list_users;

pub use change_role::{ChangeUserRoleCommand, ChangeUserRoleHandler};
pub use dashboard_stats::DashboardStatsHandler;
pub use delete_user::{DeleteUserCommand, DeleteUserHandler};
pub use list_properties::{ListPropertiesByStatusHandler, ListPropertiesByStatusQuery};
pub use list_users::{ListUsersHandler, ListUsersQuery};
