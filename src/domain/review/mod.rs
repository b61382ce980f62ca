//! Property reviews and rating summaries.

use serde::Serialize;

use crate::domain::foundation::{
    validation, DomainError, OwnedByUser, PropertyId, ReviewId, Timestamp, UserId,
    ValidationError,
};

/// Star rating between 1 and 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        validation::range("rating", value, 1, 5).map(|v| Rating(v as u8))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub id: ReviewId,
    pub property_id: PropertyId,
    pub author_id: UserId,
    pub rating: Rating,
    pub comment: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Review {
    /// Owners may not review their own property.
    pub fn write(
        property_id: PropertyId,
        property_owner: &UserId,
        author_id: UserId,
        rating: i64,
        comment: Option<&str>,
    ) -> Result<Self, DomainError> {
        if property_owner == &author_id {
            return Err(DomainError::forbidden("You cannot review your own property"));
        }
        let now = Timestamp::now();
        Ok(Self {
            id: ReviewId::new(),
            property_id,
            author_id,
            rating: Rating::new(rating)?,
            comment: validation::optional_text("comment", comment, 2000)?,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn revise(&mut self, rating: Option<i64>, comment: Option<&str>) -> Result<(), DomainError> {
        if let Some(r) = rating {
            self.rating = Rating::new(r)?;
        }
        if comment.is_some() {
            self.comment = validation::optional_text("comment", comment, 2000)?;
        }
        self.updated_at = Timestamp::now();
        Ok(())
    }
}

impl OwnedByUser for Review {
    fn owner_id(&self) -> &UserId {
        &self.author_id
    }
}

/// Aggregate rating for a property.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewSummary {
    /// Mean rating rounded to one decimal; `0.0` without reviews.
    pub average: f64,
    pub count: u64,
    /// Count per star, index 0 is one star.
    pub distribution: [u64; 5],
}

impl ReviewSummary {
    /// Builds a summary from per-star counts.
    pub fn from_distribution(distribution: [u64; 5]) -> Self {
        let count: u64 = distribution.iter().sum();
        let weighted: u64 = distribution
            .iter()
            .enumerate()
            .map(|(i, n)| (i as u64 + 1) * n)
            .sum();
        let average = if count == 0 {
            0.0
        } else {
            (weighted as f64 / count as f64 * 10.0).round() / 10.0
        };
        Self {
            average,
            count,
            distribution,
        }
    }
}
