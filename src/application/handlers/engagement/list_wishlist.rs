//! Wishlist queries.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, Page, PageRequest, PropertyId, UserId};
use crate::domain::property::Property;
use crate::ports::WishlistRepository;

#[derive(Debug, Clone)]
pub struct ListWishlistQuery {
    pub user_id: UserId,
    pub page: PageRequest,
}

pub struct ListWishlistHandler {
    wishlists: Arc<dyn WishlistRepository>,
}

impl ListWishlistHandler {
    pub fn new(wishlists: Arc<dyn WishlistRepository>) -> Self {
        Self { wishlists }
    }

    pub async fn handle(&self, query: ListWishlistQuery) -> Result<Page<Property>, DomainError> {
        self.wishlists.list(&query.user_id, query.page).await
    }
}

pub struct WishlistIdsHandler {
    wishlists: Arc<dyn WishlistRepository>,
}

impl WishlistIdsHandler {
    pub fn new(wishlists: Arc<dyn WishlistRepository>) -> Self {
        Self { wishlists }
    }

    pub async fn handle(&self, user_id: UserId) -> Result<Vec<PropertyId>, DomainError> {
        self.wishlists.saved_ids(&user_id).await
    }
}
