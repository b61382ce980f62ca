//! Ownership trait for user-owned resources.
//!
//! Listings, short-stay listings, bookings and reviews all belong to a single
//! user. Implementing [`OwnedByUser`] gives them a uniform `check_ownership`
//! that produces a `Forbidden` domain error.
//!
//! ```ignore
//! listing.check_ownership(&user.id)?;
//! ```

use super::{DomainError, ErrorCode, UserId};

/// Trait for aggregates that have a single owner.
pub trait OwnedByUser {
    /// Returns the ID of the user who owns this resource.
    fn owner_id(&self) -> &UserId;

    /// Checks if the given user is the owner.
    fn is_owner(&self, user_id: &UserId) -> bool {
        self.owner_id() == user_id
    }

    /// Validates ownership, returning `Forbidden` if the user is not the owner.
    fn check_ownership(&self, user_id: &UserId) -> Result<(), DomainError> {
        if self.is_owner(user_id) {
            Ok(())
        } else {
            Err(DomainError::new(
                ErrorCode::Forbidden,
                "User does not own this resource",
            )
            .with_detail("requested_by", user_id.to_string()))
        }
    }
}
