//! Site-visit booking handlers.
//!
//! ## Commands
//! - `RequestVisitHandler` - Visitor asks for a slot; owner is emailed
//! - `UpdateBookingStatusHandler` - Owner decisions and cancellation by either side
//!
//! ## Queries
//! - `GetBookingHandler` - Participant-only view

mod get_booking;
mod request_visit;
mod update_status;

pub use get_booking::{GetBookingHandler, GetBookingQuery};
pub use request_visit::{RequestVisitCommand, RequestVisitHandler};
pub use update_status::{BookingAction, UpdateBookingStatusCommand, UpdateBookingStatusHandler};
