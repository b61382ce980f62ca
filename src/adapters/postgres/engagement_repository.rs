//! PostgreSQL implementations of WishlistRepository and ReviewRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{
    DomainError, ErrorCode, Page, PageRequest, PropertyId, ReviewId, UserId,
};
use crate::domain::property::Property;
use crate::domain::review::{Rating, Review, ReviewSummary};
use crate::ports::{ReviewRepository, ReviewView, WishlistRepository};

use super::property_repository::{into_properties, PropertyRow, PROPERTY_COLUMNS};
use super::support::{db_error, is_unique_violation, total, ts};

pub struct PostgresWishlistRepository {
    pool: PgPool,
}

impl PostgresWishlistRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WishlistRepository for PostgresWishlistRepository {
    async fn add(&self, user: &UserId, property: &PropertyId) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO wishlists (user_id, property_id) VALUES ($1, $2)
            ON CONFLICT (user_id, property_id) DO NOTHING
            "#,
        )
        .bind(user.as_uuid())
        .bind(property.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to save property"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove(&self, user: &UserId, property: &PropertyId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM wishlists WHERE user_id = $1 AND property_id = $2")
            .bind(user.as_uuid())
            .bind(property.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to remove saved property"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, user: &UserId, page: PageRequest) -> Result<Page<Property>, DomainError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM wishlists WHERE user_id = $1")
            .bind(user.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count saved properties"))?;

        let rows: Vec<PropertyRow> = sqlx::query_as(&format!(
            "SELECT {} FROM wishlists w JOIN properties p ON p.id = w.property_id \
             WHERE w.user_id = $1 ORDER BY w.created_at DESC LIMIT $2 OFFSET $3",
            PROPERTY_COLUMNS
        ))
        .bind(user.as_uuid())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list saved properties"))?;

        Ok(Page::new(into_properties(rows)?, total(count), page))
    }

    async fn contains(&self, user: &UserId, property: &PropertyId) -> Result<bool, DomainError> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM wishlists WHERE user_id = $1 AND property_id = $2)",
        )
        .bind(user.as_uuid())
        .bind(property.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to check saved property"))?;

        Ok(exists)
    }

    async fn saved_ids(&self, user: &UserId) -> Result<Vec<PropertyId>, DomainError> {
        let rows: Vec<(Uuid,)> = sqlx::query_as("SELECT property_id FROM wishlists WHERE user_id = $1")
            .bind(user.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list saved ids"))?;

        Ok(rows.into_iter().map(|(id,)| PropertyId::from_uuid(id)).collect())
    }
}

pub struct PostgresReviewRepository {
    pool: PgPool,
}

impl PostgresReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ReviewRow {
    id: Uuid,
    property_id: Uuid,
    author_id: Uuid,
    rating: i16,
    comment: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ReviewRow> for Review {
    type Error = DomainError;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        let rating = Rating::new(i64::from(row.rating)).map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid rating: {}", e))
        })?;
        Ok(Review {
            id: ReviewId::from_uuid(row.id),
            property_id: PropertyId::from_uuid(row.property_id),
            author_id: UserId::from_uuid(row.author_id),
            rating,
            comment: row.comment,
            created_at: ts(row.created_at),
            updated_at: ts(row.updated_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ReviewViewRow {
    #[sqlx(flatten)]
    review: ReviewRow,
    author_name: Option<String>,
}

#[async_trait]
impl ReviewRepository for PostgresReviewRepository {
    async fn create(&self, review: &Review) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO reviews (id, property_id, author_id, rating, comment, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(review.id.as_uuid())
        .bind(review.property_id.as_uuid())
        .bind(review.author_id.as_uuid())
        .bind(i16::from(review.rating.value()))
        .bind(&review.comment)
        .bind(review.created_at.as_datetime())
        .bind(review.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, "reviews_property_author_key") {
                return DomainError::new(
                    ErrorCode::Conflict,
                    "You have already reviewed this property",
                );
            }
            DomainError::database("Failed to insert review", e)
        })?;

        Ok(())
    }

    async fn update(&self, review: &Review) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE reviews SET rating = $2, comment = $3, updated_at = $4 WHERE id = $1",
        )
        .bind(review.id.as_uuid())
        .bind(i16::from(review.rating.value()))
        .bind(&review.comment)
        .bind(review.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to update review"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(ErrorCode::ReviewNotFound, "Review", review.id));
        }
        Ok(())
    }

    async fn delete(&self, id: &ReviewId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete review"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, DomainError> {
        let row: Option<ReviewRow> = sqlx::query_as(
            r#"
            SELECT id, property_id, author_id, rating, comment, created_at, updated_at
            FROM reviews WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find review"))?;

        row.map(Review::try_from).transpose()
    }

    async fn list_for_property(
        &self,
        property: &PropertyId,
        page: PageRequest,
    ) -> Result<Page<ReviewView>, DomainError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reviews WHERE property_id = $1")
            .bind(property.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count reviews"))?;

        let rows: Vec<ReviewViewRow> = sqlx::query_as(
            r#"
            SELECT r.id, r.property_id, r.author_id, r.rating, r.comment, r.created_at,
                   r.updated_at, u.name AS author_name
            FROM reviews r
            LEFT JOIN users u ON u.id = r.author_id
            WHERE r.property_id = $1
            ORDER BY r.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(property.as_uuid())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list reviews"))?;

        let views = rows
            .into_iter()
            .map(|row| {
                Ok(ReviewView {
                    review: Review::try_from(row.review)?,
                    author_name: row.author_name.unwrap_or_default(),
                })
            })
            .collect::<Result<Vec<_>, DomainError>>()?;
        Ok(Page::new(views, total(count), page))
    }

    async fn summary(&self, property: &PropertyId) -> Result<ReviewSummary, DomainError> {
        let rows: Vec<(i16, i64)> = sqlx::query_as(
            "SELECT rating, COUNT(*) FROM reviews WHERE property_id = $1 GROUP BY rating",
        )
        .bind(property.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to summarise reviews"))?;

        Ok(ReviewSummary::from_distribution(distribution(&rows)))
    }
}

/// Folds `(rating, count)` groups into per-star counts.
fn distribution(groups: &[(i16, i64)]) -> [u64; 5] {
    let mut stars = [0u64; 5];
    for &(rating, count) in groups {
        let star = rating.clamp(1, 5) as usize;
        stars[star - 1] += count.max(0) as u64;
    }
    stars
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distribution_folds_groups() {
        let stars = distribution(&[(5, 3), (1, 1), (4, 2)]);
        assert_eq!(stars, [1, 0, 0, 2, 3]);
        let summary = ReviewSummary::from_distribution(stars);
        assert_eq!(summary.count, 6);
        assert_eq!(summary.average, 4.0);
    }

    #[test]
    fn out_of_range_rating_row_is_rejected() {
        let now = Utc::now();
        let err = Review::try_from(ReviewRow {
            id: Uuid::new_v4(),
            property_id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            rating: 9,
            comment: None,
            created_at: now,
            updated_at: now,
        })
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }
}
