//! HTTP DTOs for wishlists.

use serde::Serialize;

use crate::domain::foundation::PropertyId;

/// Result of an add or remove.
#[derive(Debug, Clone, Serialize)]
pub struct WishlistChangeResponse {
    pub property_id: PropertyId,
    pub saved: bool,
    /// False when the request was a no-op.
    pub changed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct WishlistIdsResponse {
    pub property_ids: Vec<PropertyId>,
}
