//! RemoveFromWishlistHandler - Unsaves a property.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, PropertyId, UserId};
use crate::ports::WishlistRepository;

#[derive(Debug, Clone)]
pub struct RemoveFromWishlistCommand {
    pub user_id: UserId,
    pub property_id: PropertyId,
}

pub struct RemoveFromWishlistHandler {
    wishlists: Arc<dyn WishlistRepository>,
}

impl RemoveFromWishlistHandler {
    pub fn new(wishlists: Arc<dyn WishlistRepository>) -> Self {
        Self { wishlists }
    }

    /// Returns whether anything was removed.
    pub async fn handle(&self, cmd: RemoveFromWishlistCommand) -> Result<bool, DomainError> {
        self.wishlists.remove(&cmd.user_id, &cmd.property_id).await
    }
}
