//! HTTP handlers for `/api/reviews`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::application::handlers::engagement::{
    CreateReviewCommand, DeleteReviewCommand, ListReviewsQuery, UpdateReviewCommand,
};
use crate::domain::foundation::{PageQuery, PropertyId, ReviewId};

use super::super::error::{ApiError, ApiJson};
use super::super::middleware::RequireAuth;
use super::super::state::AppState;
use super::dto::{CreateReviewRequest, PropertyReviewsResponse, ReviewResponse, UpdateReviewRequest};

/// GET /api/reviews/property/:id - public, with rating summary
pub async fn list_property_reviews(
    State(state): State<AppState>,
    Path(property_id): Path<PropertyId>,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let reviews = state
        .list_reviews_handler()
        .handle(ListReviewsQuery {
            property_id,
            page: page.into(),
        })
        .await?;
    Ok(Json(PropertyReviewsResponse::from(reviews)))
}

/// POST /api/reviews
pub async fn create_review(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(req): ApiJson<CreateReviewRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let review = state
        .create_review_handler()
        .handle(CreateReviewCommand {
            author_id: user.id,
            property_id: req.property_id,
            rating: req.rating,
            comment: req.comment,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ReviewResponse::from(review))))
}

/// PATCH /api/reviews/:id - author only
pub async fn update_review(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(review_id): Path<ReviewId>,
    ApiJson(req): ApiJson<UpdateReviewRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let review = state
        .update_review_handler()
        .handle(UpdateReviewCommand {
            author_id: user.id,
            review_id,
            rating: req.rating,
            comment: req.comment,
        })
        .await?;
    Ok(Json(ReviewResponse::from(review)))
}

/// DELETE /api/reviews/:id - author or admin
pub async fn delete_review(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(review_id): Path<ReviewId>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .delete_review_handler()
        .handle(DeleteReviewCommand {
            actor: user,
            review_id,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
