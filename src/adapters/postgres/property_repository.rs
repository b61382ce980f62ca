//! PostgreSQL implementation of PropertyRepository.
//!
//! Search is plain SQL filtering: `ILIKE` on text, ranges on price and
//! bedrooms. Optional filters bind as NULL and short-circuit in the WHERE
//! clause so the statement text stays fixed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, Page, PageRequest, PropertyId, UserId};
use crate::domain::property::{
    like_pattern, GeoPoint, Property, PropertyDetails, PropertySearch, PropertyStatus,
};
use crate::ports::PropertyRepository;

use super::support::{db_error, parse_column, total, ts};

pub struct PostgresPropertyRepository {
    pool: PgPool,
}

impl PostgresPropertyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(super) struct PropertyRow {
    id: Uuid,
    owner_id: Uuid,
    title: String,
    description: String,
    property_type: String,
    listing_type: String,
    price: i64,
    area_sqft: i64,
    bedrooms: Option<i32>,
    bathrooms: Option<i32>,
    furnishing: Option<String>,
    city: String,
    locality: String,
    address: String,
    lat: Option<f64>,
    lng: Option<f64>,
    amenities: Vec<String>,
    images: Vec<String>,
    status: String,
    rejection_reason: Option<String>,
    featured: bool,
    view_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PropertyRow> for Property {
    type Error = DomainError;

    fn try_from(row: PropertyRow) -> Result<Self, Self::Error> {
        let location = match (row.lat, row.lng) {
            (Some(lat), Some(lng)) => Some(GeoPoint { lat, lng }),
            _ => None,
        };
        let furnishing = row
            .furnishing
            .as_deref()
            .map(|f| parse_column("furnishing", f))
            .transpose()?;

        Ok(Property {
            id: PropertyId::from_uuid(row.id),
            owner_id: UserId::from_uuid(row.owner_id),
            details: PropertyDetails {
                title: row.title,
                description: row.description,
                property_type: parse_column("property_type", &row.property_type)?,
                listing_type: parse_column("listing_type", &row.listing_type)?,
                price: row.price,
                area_sqft: row.area_sqft,
                bedrooms: row.bedrooms,
                bathrooms: row.bathrooms,
                furnishing,
                city: row.city,
                locality: row.locality,
                address: row.address,
                location,
                amenities: row.amenities,
                images: row.images,
            },
            status: parse_column("status", &row.status)?,
            rejection_reason: row.rejection_reason,
            featured: row.featured,
            view_count: row.view_count,
            created_at: ts(row.created_at),
            updated_at: ts(row.updated_at),
        })
    }
}

/// Column list shared with the wishlist join, prefixed with the `p` alias.
pub(super) const PROPERTY_COLUMNS: &str = "p.id, p.owner_id, p.title, p.description, \
    p.property_type, p.listing_type, p.price, p.area_sqft, p.bedrooms, p.bathrooms, \
    p.furnishing, p.city, p.locality, p.address, p.lat, p.lng, p.amenities, p.images, \
    p.status, p.rejection_reason, p.featured, p.view_count, p.created_at, p.updated_at";

pub(super) fn into_properties(rows: Vec<PropertyRow>) -> Result<Vec<Property>, DomainError> {
    rows.into_iter().map(Property::try_from).collect()
}

const SEARCH_FILTER: &str = r#"
    WHERE p.status = 'active'
      AND ($1::text IS NULL OR p.city ILIKE $1)
      AND ($2::text IS NULL OR p.locality ILIKE $2)
      AND ($3::text IS NULL OR p.title ILIKE $3 OR p.description ILIKE $3)
      AND ($4::text IS NULL OR p.property_type = $4)
      AND ($5::text IS NULL OR p.listing_type = $5)
      AND ($6::bigint IS NULL OR p.price >= $6)
      AND ($7::bigint IS NULL OR p.price <= $7)
      AND ($8::int IS NULL OR COALESCE(p.bedrooms, 0) >= $8)
"#;

const SEARCH_ORDER: &str = r#"
    ORDER BY p.featured DESC,
             CASE WHEN $9 = 'price_asc' THEN p.price END ASC,
             CASE WHEN $9 = 'price_desc' THEN p.price END DESC,
             p.created_at DESC
"#;

#[async_trait]
impl PropertyRepository for PostgresPropertyRepository {
    async fn create(&self, property: &Property) -> Result<(), DomainError> {
        let d = &property.details;
        sqlx::query(
            r#"
            INSERT INTO properties (
                id, owner_id, title, description, property_type, listing_type, price,
                area_sqft, bedrooms, bathrooms, furnishing, city, locality, address,
                lat, lng, amenities, images, status, rejection_reason, featured,
                view_count, created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                $15, $16, $17, $18, $19, $20, $21, $22, $23, $24
            )
            "#,
        )
        .bind(property.id.as_uuid())
        .bind(property.owner_id.as_uuid())
        .bind(&d.title)
        .bind(&d.description)
        .bind(d.property_type.as_str())
        .bind(d.listing_type.as_str())
        .bind(d.price)
        .bind(d.area_sqft)
        .bind(d.bedrooms)
        .bind(d.bathrooms)
        .bind(d.furnishing.map(|f| f.as_str()))
        .bind(&d.city)
        .bind(&d.locality)
        .bind(&d.address)
        .bind(d.location.map(|g| g.lat))
        .bind(d.location.map(|g| g.lng))
        .bind(&d.amenities)
        .bind(&d.images)
        .bind(property.status.as_str())
        .bind(&property.rejection_reason)
        .bind(property.featured)
        .bind(property.view_count)
        .bind(property.created_at.as_datetime())
        .bind(property.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to insert property"))?;

        Ok(())
    }

    async fn update(&self, property: &Property) -> Result<(), DomainError> {
        let d = &property.details;
        let result = sqlx::query(
            r#"
            UPDATE properties SET
                title = $2, description = $3, property_type = $4, listing_type = $5,
                price = $6, area_sqft = $7, bedrooms = $8, bathrooms = $9, furnishing = $10,
                city = $11, locality = $12, address = $13, lat = $14, lng = $15,
                amenities = $16, images = $17, status = $18, rejection_reason = $19,
                featured = $20, updated_at = $21
            WHERE id = $1
            "#,
        )
        .bind(property.id.as_uuid())
        .bind(&d.title)
        .bind(&d.description)
        .bind(d.property_type.as_str())
        .bind(d.listing_type.as_str())
        .bind(d.price)
        .bind(d.area_sqft)
        .bind(d.bedrooms)
        .bind(d.bathrooms)
        .bind(d.furnishing.map(|f| f.as_str()))
        .bind(&d.city)
        .bind(&d.locality)
        .bind(&d.address)
        .bind(d.location.map(|g| g.lat))
        .bind(d.location.map(|g| g.lng))
        .bind(&d.amenities)
        .bind(&d.images)
        .bind(property.status.as_str())
        .bind(&property.rejection_reason)
        .bind(property.featured)
        .bind(property.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to update property"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(
                ErrorCode::PropertyNotFound,
                "Property",
                property.id,
            ));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &PropertyId) -> Result<Option<Property>, DomainError> {
        let row: Option<PropertyRow> = sqlx::query_as(&format!(
            "SELECT {} FROM properties p WHERE p.id = $1",
            PROPERTY_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find property"))?;

        row.map(Property::try_from).transpose()
    }

    async fn search(&self, search: &PropertySearch, page: PageRequest) -> Result<Page<Property>, DomainError> {
        let city = search.city.as_deref().map(like_pattern);
        let locality = search.locality.as_deref().map(like_pattern);
        let q = search.q.as_deref().map(like_pattern);
        let property_type = search.property_type.map(|t| t.as_str());
        let listing_type = search.listing_type.map(|t| t.as_str());

        let (count,): (i64,) = sqlx::query_as(&format!(
            "SELECT COUNT(*) FROM properties p {}",
            SEARCH_FILTER
        ))
        .bind(&city)
        .bind(&locality)
        .bind(&q)
        .bind(property_type)
        .bind(listing_type)
        .bind(search.min_price)
        .bind(search.max_price)
        .bind(search.min_bedrooms)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to count properties"))?;

        let rows: Vec<PropertyRow> = sqlx::query_as(&format!(
            "SELECT {} FROM properties p {} {} LIMIT $10 OFFSET $11",
            PROPERTY_COLUMNS, SEARCH_FILTER, SEARCH_ORDER
        ))
        .bind(&city)
        .bind(&locality)
        .bind(&q)
        .bind(property_type)
        .bind(listing_type)
        .bind(search.min_price)
        .bind(search.max_price)
        .bind(search.min_bedrooms)
        .bind(search.sort.as_str())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to search properties"))?;

        Ok(Page::new(into_properties(rows)?, total(count), page))
    }

    async fn list_by_owner(&self, owner: &UserId, page: PageRequest) -> Result<Page<Property>, DomainError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM properties WHERE owner_id = $1")
            .bind(owner.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count owner properties"))?;

        let rows: Vec<PropertyRow> = sqlx::query_as(&format!(
            "SELECT {} FROM properties p WHERE p.owner_id = $1 \
             ORDER BY p.created_at DESC LIMIT $2 OFFSET $3",
            PROPERTY_COLUMNS
        ))
        .bind(owner.as_uuid())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list owner properties"))?;

        Ok(Page::new(into_properties(rows)?, total(count), page))
    }

    async fn list_by_status(
        &self,
        status: Option<PropertyStatus>,
        page: PageRequest,
    ) -> Result<Page<Property>, DomainError> {
        let status = status.map(|s| s.as_str());

        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM properties WHERE ($1::text IS NULL OR status = $1)")
                .bind(status)
                .fetch_one(&self.pool)
                .await
                .map_err(db_error("Failed to count properties"))?;

        let rows: Vec<PropertyRow> = sqlx::query_as(&format!(
            "SELECT {} FROM properties p WHERE ($1::text IS NULL OR p.status = $1) \
             ORDER BY p.created_at DESC LIMIT $2 OFFSET $3",
            PROPERTY_COLUMNS
        ))
        .bind(status)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list properties"))?;

        Ok(Page::new(into_properties(rows)?, total(count), page))
    }

    async fn count_counted_for_owner(&self, owner: &UserId) -> Result<i64, DomainError> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM properties
            WHERE owner_id = $1 AND status IN ('pending_review', 'active', 'rejected')
            "#,
        )
        .bind(owner.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to count listings"))?;

        Ok(count)
    }

    async fn increment_views(&self, id: &PropertyId) -> Result<(), DomainError> {
        sqlx::query("UPDATE properties SET view_count = view_count + 1 WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to record view"))?;
        Ok(())
    }

    async fn delete(&self, id: &PropertyId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM properties WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete property"))?;
        Ok(result.rows_affected() > 0)
    }
}
