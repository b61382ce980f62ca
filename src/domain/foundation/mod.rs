//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, traits and error types
//! that form the vocabulary of the EstateHub domain.

#[macro_use]
mod string_enum;

mod auth;
mod errors;
mod ids;
mod ownership;
mod pagination;
mod role;
mod state_machine;
mod timestamp;
pub mod validation;

pub use auth::{AuthError, AuthenticatedUser};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{
    BookingId, ConversationId, LeadId, ListingId, LiveBookingId, MessageId, ProjectId,
    PropertyId, ReservationId, ReviewId, SubscriptionId, TowerId, UnitId, UserId,
};
pub use ownership::OwnedByUser;
pub use pagination::{Page, PageQuery, PageRequest, DEFAULT_PER_PAGE, MAX_PER_PAGE};
pub use role::UserRole;
pub use state_machine::StateMachine;
pub(crate) use string_enum::string_enum;
pub use timestamp::Timestamp;
