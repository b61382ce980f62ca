//! DeleteReviewHandler - Author or admin removes a review.

use std::sync::Arc;

use crate::domain::foundation::{AuthenticatedUser, DomainError, ReviewId};
use crate::ports::ReviewRepository;

use super::load_review;

#[derive(Debug, Clone)]
pub struct DeleteReviewCommand {
    pub actor: AuthenticatedUser,
    pub review_id: ReviewId,
}

pub struct DeleteReviewHandler {
    reviews: Arc<dyn ReviewRepository>,
}

impl DeleteReviewHandler {
    pub fn new(reviews: Arc<dyn ReviewRepository>) -> Self {
        Self { reviews }
    }

    pub async fn handle(&self, cmd: DeleteReviewCommand) -> Result<(), DomainError> {
        let review = load_review(&self.reviews, &cmd.review_id).await?;
        if !cmd.actor.can_manage(&review.author_id) {
            return Err(DomainError::forbidden("You cannot delete this review"));
        }
        self.reviews.delete(&review.id).await?;
        tracing::info!(review_id = %review.id, actor_id = %cmd.actor.id, "Review deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::test_support::{admin_user, caller, verified_user};
    use crate::domain::foundation::{ErrorCode, PropertyId, UserId};
    use crate::domain::review::Review;

    #[tokio::test]
    async fn admin_may_delete_any_review_but_strangers_may_not() {
        let store = InMemoryStore::new();
        let admin = admin_user(&store).await;
        let stranger = verified_user(&store, "stranger@example.com").await;
        let review = Review::write(PropertyId::new(), &UserId::new(), UserId::new(), 2, None).unwrap();
        ReviewRepository::create(&store, &review).await.unwrap();
        let handler = DeleteReviewHandler::new(Arc::new(store.clone()));

        let err = handler
            .handle(DeleteReviewCommand {
                actor: caller(&stranger),
                review_id: review.id,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);

        handler
            .handle(DeleteReviewCommand {
                actor: caller(&admin),
                review_id: review.id,
            })
            .await
            .unwrap();
        assert!(store.find_by_id(&review.id).await.unwrap().is_none());
    }
}
