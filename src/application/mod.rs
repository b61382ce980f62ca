//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers (writes) and query handlers (reads) live side by side
//! per area; the periodic sweeper and the email notifier sit beside them.

pub mod handlers;
pub mod maintenance;
pub mod notifier;

pub use maintenance::{MaintenanceSweeper, SweepReport};
pub use notifier::Notifier;
