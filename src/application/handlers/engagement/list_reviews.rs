//! ListReviewsHandler - Reviews for one property with the rating summary.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, Page, PageRequest, PropertyId};
use crate::domain::review::ReviewSummary;
use crate::ports::{ReviewRepository, ReviewView};

#[derive(Debug, Clone)]
pub struct ListReviewsQuery {
    pub property_id: PropertyId,
    pub page: PageRequest,
}

#[derive(Debug, Clone)]
pub struct PropertyReviews {
    pub summary: ReviewSummary,
    pub reviews: Page<ReviewView>,
}

pub struct ListReviewsHandler {
    reviews: Arc<dyn ReviewRepository>,
}

impl ListReviewsHandler {
    pub fn new(reviews: Arc<dyn ReviewRepository>) -> Self {
        Self { reviews }
    }

    pub async fn handle(&self, query: ListReviewsQuery) -> Result<PropertyReviews, DomainError> {
        let summary = self.reviews.summary(&query.property_id).await?;
        let reviews = self.reviews.list_for_property(&query.property_id, query.page).await?;
        Ok(PropertyReviews { summary, reviews })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::foundation::UserId;
    use crate::domain::review::Review;

    #[tokio::test]
    async fn summary_averages_to_one_decimal() {
        let store = InMemoryStore::new();
        let property = PropertyId::new();
        let owner = UserId::new();
        for rating in [5, 4, 4] {
            let review = Review::write(property, &owner, UserId::new(), rating, None).unwrap();
            store.create(&review).await.unwrap();
        }

        let result = ListReviewsHandler::new(Arc::new(store.clone()))
            .handle(ListReviewsQuery {
                property_id: property,
                page: PageRequest::default(),
            })
            .await
            .unwrap();
        assert_eq!(result.summary.count, 3);
        assert_eq!(result.summary.average, 4.3);
        assert_eq!(result.summary.distribution, [0, 0, 0, 2, 1]);
        assert_eq!(result.reviews.items.len(), 3);
    }
}
