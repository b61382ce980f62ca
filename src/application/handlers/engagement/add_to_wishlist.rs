//! AddToWishlistHandler - Saves a property for the caller.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, PropertyId, UserId};
use crate::ports::{PropertyRepository, WishlistRepository};

#[derive(Debug, Clone)]
pub struct AddToWishlistCommand {
    pub user_id: UserId,
    pub property_id: PropertyId,
}

pub struct AddToWishlistHandler {
    wishlists: Arc<dyn WishlistRepository>,
    properties: Arc<dyn PropertyRepository>,
}

impl AddToWishlistHandler {
    pub fn new(wishlists: Arc<dyn WishlistRepository>, properties: Arc<dyn PropertyRepository>) -> Self {
        Self {
            wishlists,
            properties,
        }
    }

    /// Returns whether the property was newly saved.
    pub async fn handle(&self, cmd: AddToWishlistCommand) -> Result<bool, DomainError> {
        let visible = self
            .properties
            .find_by_id(&cmd.property_id)
            .await?
            .map(|p| p.is_public() || p.owner_id == cmd.user_id)
            .unwrap_or(false);
        if !visible {
            return Err(DomainError::not_found(
                ErrorCode::PropertyNotFound,
                "Property",
                cmd.property_id,
            ));
        }
        self.wishlists.add(&cmd.user_id, &cmd.property_id).await
    }
}
