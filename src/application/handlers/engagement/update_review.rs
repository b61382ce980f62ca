//! UpdateReviewHandler - Author revises a review.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ReviewId, UserId};
use crate::domain::review::Review;
use crate::ports::ReviewRepository;

use super::load_review;

#[derive(Debug, Clone)]
pub struct UpdateReviewCommand {
    pub author_id: UserId,
    pub review_id: ReviewId,
    pub rating: Option<i64>,
    pub comment: Option<String>,
}

pub struct UpdateReviewHandler {
    reviews: Arc<dyn ReviewRepository>,
}

impl UpdateReviewHandler {
    pub fn new(reviews: Arc<dyn ReviewRepository>) -> Self {
        Self { reviews }
    }

    pub async fn handle(&self, cmd: UpdateReviewCommand) -> Result<Review, DomainError> {
        let mut review = load_review(&self.reviews, &cmd.review_id).await?;
        if review.author_id != cmd.author_id {
            return Err(DomainError::forbidden("Only the author can edit this review"));
        }
        review.revise(cmd.rating, cmd.comment.as_deref())?;
        self.reviews.update(&review).await?;
        Ok(review)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::foundation::{ErrorCode, PropertyId};

    async fn stored(store: &InMemoryStore, author: UserId) -> Review {
        let review = Review::write(PropertyId::new(), &UserId::new(), author, 3, None).unwrap();
        ReviewRepository::create(store, &review).await.unwrap();
        review
    }

    #[tokio::test]
    async fn author_changes_rating() {
        let store = InMemoryStore::new();
        let author = UserId::new();
        let review = stored(&store, author).await;

        let updated = UpdateReviewHandler::new(Arc::new(store.clone()))
            .handle(UpdateReviewCommand {
                author_id: author,
                review_id: review.id,
                rating: Some(5),
                comment: None,
            })
            .await
            .unwrap();
        assert_eq!(updated.rating.value(), 5);
    }

    #[tokio::test]
    async fn someone_else_is_forbidden() {
        let store = InMemoryStore::new();
        let review = stored(&store, UserId::new()).await;

        let err = UpdateReviewHandler::new(Arc::new(store.clone()))
            .handle(UpdateReviewCommand {
                author_id: UserId::new(),
                review_id: review.id,
                rating: Some(1),
                comment: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }
}
