//! HTTP DTOs for reviews.

use serde::{Deserialize, Serialize};

use crate::application::handlers::engagement::PropertyReviews;
use crate::domain::foundation::{Page, PropertyId, ReviewId, Timestamp, UserId};
use crate::domain::review::{Review, ReviewSummary};
use crate::ports::ReviewView;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct CreateReviewRequest {
    pub property_id: PropertyId,
    pub rating: i64,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateReviewRequest {
    #[serde(default)]
    pub rating: Option<i64>,
    #[serde(default)]
    pub comment: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct ReviewResponse {
    pub id: ReviewId,
    pub property_id: PropertyId,
    pub author_id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    pub rating: u8,
    pub comment: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<Review> for ReviewResponse {
    fn from(r: Review) -> Self {
        Self {
            id: r.id,
            property_id: r.property_id,
            author_id: r.author_id,
            author_name: None,
            rating: r.rating.value(),
            comment: r.comment,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

impl From<ReviewView> for ReviewResponse {
    fn from(v: ReviewView) -> Self {
        Self {
            author_name: Some(v.author_name),
            ..Self::from(v.review)
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PropertyReviewsResponse {
    pub summary: ReviewSummary,
    pub reviews: Page<ReviewResponse>,
}

impl From<PropertyReviews> for PropertyReviewsResponse {
    fn from(r: PropertyReviews) -> Self {
        Self {
            summary: r.summary,
            reviews: r.reviews.map(ReviewResponse::from),
        }
    }
}
