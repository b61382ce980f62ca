//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Declares a UUID-backed identifier newtype with the usual conversions.
macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for a registered account.
    UserId
);
uuid_id!(
    /// Unique identifier for a sale/rent property listing.
    PropertyId
);
uuid_id!(
    /// Unique identifier for a site-visit booking.
    BookingId
);
uuid_id!(
    /// Unique identifier for a live-group project.
    ProjectId
);
uuid_id!(
    /// Unique identifier for a tower within a live-group project.
    TowerId
);
uuid_id!(
    /// Unique identifier for a unit within a tower.
    UnitId
);
uuid_id!(
    /// Unique identifier for a confirmed live-group unit purchase.
    LiveBookingId
);
uuid_id!(
    /// Unique identifier for a short-stay listing.
    ListingId
);
uuid_id!(
    /// Unique identifier for a short-stay reservation.
    ReservationId
);
uuid_id!(
    /// Unique identifier for a buyer/owner conversation.
    ConversationId
);
uuid_id!(
    /// Unique identifier for a chat message.
    MessageId
);
uuid_id!(
    /// Unique identifier for a property review.
    ReviewId
);
uuid_id!(
    /// Unique identifier for a plan subscription.
    SubscriptionId
);
uuid_id!(
    /// Unique identifier for a marketing lead.
    LeadId
);
