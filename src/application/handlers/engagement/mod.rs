//! Wishlist and review handlers.
//!
//! ## Commands
//! - `AddToWishlistHandler`, `RemoveFromWishlistHandler` - Idempotent saves
//! - `CreateReviewHandler` - One review per user and property
//! - `UpdateReviewHandler` - Author only
//! - `DeleteReviewHandler` - Author or admin
//!
//! ## Queries
//! - `ListWishlistHandler` - Saved properties, newest save first
//! - `WishlistIdsHandler` - Saved property ids
//! - `ListReviewsHandler` - Paginated reviews with the rating summary

mod add_to_wishlist;
mod create_review;
mod delete_review;
mod list_reviews;
mod list_wishlist;
mod remove_from_wishlist;
mod update_review;

pub use add_to_wishlist::{AddToWishlistCommand, AddToWishlistHandler};
pub use create_review::{CreateReviewCommand, CreateReviewHandler};
pub use delete_review::{DeleteReviewCommand, DeleteReviewHandler};
pub use list_reviews::{ListReviewsHandler, ListReviewsQuery, PropertyReviews};
pub use list_wishlist::{ListWishlistHandler, ListWishlistQuery, WishlistIdsHandler};
pub use remove_from_wishlist::{RemoveFromWishlistCommand, RemoveFromWishlistHandler};
pub use update_review::{UpdateReviewCommand, UpdateReviewHandler};

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, ReviewId};
use crate::domain::review::Review;
use crate::ports::ReviewRepository;

pub(crate) async fn load_review(
    reviews: &Arc<dyn ReviewRepository>,
    id: &ReviewId,
) -> Result<Review, DomainError> {
    reviews
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found(ErrorCode::ReviewNotFound, "Review", id))
}
