//! Live grouping: collective purchase of units in a tower project.
//!
//! # Module Structure
//!
//! - `project` - Project aggregate, status and group pricing
//! - `unit` - Units, the hold workflow and confirmed bookings
//! - `hierarchy` - Tower/unit tree and the bulk sync planner
//! - `errors` - Live-group error type

mod errors;
mod hierarchy;
mod project;
mod unit;

pub use errors::LiveGroupError;
pub use hierarchy::{
    plan_sync, validate_desired, DesiredTower, DesiredUnit, Hierarchy, SyncCounts, SyncOutcome,
    SyncPlan, Tower, TowerWithUnits, MAX_TOWER_FLOORS,
};
pub use project::{
    group_price, Project, ProjectDetails, ProjectInput, ProjectProgress, ProjectStatus,
    MAX_GROUP_DISCOUNT_PCT,
};
pub use unit::{LiveBooking, LiveBookingStatus, LockPolicy, Unit, UnitStatus};

#[cfg(test)]
pub(crate) use project::tests::sample_input as sample_project_input;
#[cfg(test)]
pub(crate) use unit::tests::available_unit;
