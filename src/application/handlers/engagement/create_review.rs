//! CreateReviewHandler - Rates a property.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, PropertyId, UserId};
use crate::domain::review::Review;
use crate::ports::{PropertyRepository, ReviewRepository};

#[derive(Debug, Clone)]
pub struct CreateReviewCommand {
    pub author_id: UserId,
    pub property_id: PropertyId,
    pub rating: i64,
    pub comment: Option<String>,
}

pub struct CreateReviewHandler {
    reviews: Arc<dyn ReviewRepository>,
    properties: Arc<dyn PropertyRepository>,
}

impl CreateReviewHandler {
    pub fn new(reviews: Arc<dyn ReviewRepository>, properties: Arc<dyn PropertyRepository>) -> Self {
        Self { reviews, properties }
    }

    pub async fn handle(&self, cmd: CreateReviewCommand) -> Result<Review, DomainError> {
        // 1. Only listed properties can be reviewed
        let property = self
            .properties
            .find_by_id(&cmd.property_id)
            .await?
            .filter(|p| p.is_public())
            .ok_or_else(|| {
                DomainError::not_found(ErrorCode::PropertyNotFound, "Property", cmd.property_id)
            })?;

        // 2. Owner and rating rules
        let review = Review::write(
            property.id,
            &property.owner_id,
            cmd.author_id,
            cmd.rating,
            cmd.comment.as_deref(),
        )?;

        // 3. Uniqueness per author is enforced on insert
        self.reviews.create(&review).await?;

        tracing::info!(review_id = %review.id, property_id = %property.id, "Review posted");
        Ok(review)
    }
}
