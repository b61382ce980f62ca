//! PostgreSQL implementation of BookingRepository.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::booking::Booking;
use crate::domain::foundation::{
    BookingId, DomainError, ErrorCode, Page, PageRequest, PropertyId, UserId,
};
use crate::ports::BookingRepository;

use super::support::{db_error, is_unique_violation, parse_column, total, ts};

pub struct PostgresBookingRepository {
    pool: PgPool,
}

impl PostgresBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn list_where(
        &self,
        column: &str,
        user: &UserId,
        page: PageRequest,
    ) -> Result<Page<Booking>, DomainError> {
        let (count,): (i64,) =
            sqlx::query_as(&format!("SELECT COUNT(*) FROM bookings WHERE {} = $1", column))
                .bind(user.as_uuid())
                .fetch_one(&self.pool)
                .await
                .map_err(db_error("Failed to count bookings"))?;

        let rows: Vec<BookingRow> = sqlx::query_as(&format!(
            "SELECT {} FROM bookings WHERE {} = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3",
            BOOKING_COLUMNS, column
        ))
        .bind(user.as_uuid())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list bookings"))?;

        let bookings = rows.into_iter().map(Booking::try_from).collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(bookings, total(count), page))
    }
}

#[derive(Debug, sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    property_id: Uuid,
    visitor_id: Uuid,
    owner_id: Uuid,
    visit_date: NaiveDate,
    time_slot: String,
    contact_phone: String,
    message: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = DomainError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        Ok(Booking {
            id: BookingId::from_uuid(row.id),
            property_id: PropertyId::from_uuid(row.property_id),
            visitor_id: UserId::from_uuid(row.visitor_id),
            owner_id: UserId::from_uuid(row.owner_id),
            visit_date: row.visit_date,
            time_slot: parse_column("time_slot", &row.time_slot)?,
            contact_phone: row.contact_phone,
            message: row.message,
            status: parse_column("status", &row.status)?,
            created_at: ts(row.created_at),
            updated_at: ts(row.updated_at),
        })
    }
}

const BOOKING_COLUMNS: &str = "id, property_id, visitor_id, owner_id, visit_date, time_slot, \
                               contact_phone, message, status, created_at, updated_at";

#[async_trait]
impl BookingRepository for PostgresBookingRepository {
    async fn create(&self, booking: &Booking) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO bookings (
                id, property_id, visitor_id, owner_id, visit_date, time_slot,
                contact_phone, message, status, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(booking.id.as_uuid())
        .bind(booking.property_id.as_uuid())
        .bind(booking.visitor_id.as_uuid())
        .bind(booking.owner_id.as_uuid())
        .bind(booking.visit_date)
        .bind(booking.time_slot.as_str())
        .bind(&booking.contact_phone)
        .bind(&booking.message)
        .bind(booking.status.as_str())
        .bind(booking.created_at.as_datetime())
        .bind(booking.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, "bookings_open_visit_key") {
                return DomainError::new(
                    ErrorCode::Conflict,
                    "You already have an open visit request for this property",
                );
            }
            DomainError::database("Failed to insert booking", e)
        })?;

        Ok(())
    }

    async fn update(&self, booking: &Booking) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE bookings SET status = $2, updated_at = $3
            WHERE id = $1
            "#,
        )
        .bind(booking.id.as_uuid())
        .bind(booking.status.as_str())
        .bind(booking.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to update booking"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(
                ErrorCode::BookingNotFound,
                "Booking",
                booking.id,
            ));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, DomainError> {
        let row: Option<BookingRow> =
            sqlx::query_as(&format!("SELECT {} FROM bookings WHERE id = $1", BOOKING_COLUMNS))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error("Failed to find booking"))?;

        row.map(Booking::try_from).transpose()
    }

    async fn has_open_booking(&self, visitor: &UserId, property: &PropertyId) -> Result<bool, DomainError> {
        let (exists,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM bookings
                WHERE visitor_id = $1 AND property_id = $2 AND status IN ('pending', 'confirmed')
            )
            "#,
        )
        .bind(visitor.as_uuid())
        .bind(property.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to check open bookings"))?;

        Ok(exists)
    }

    async fn list_for_visitor(&self, visitor: &UserId, page: PageRequest) -> Result<Page<Booking>, DomainError> {
        self.list_where("visitor_id", visitor, page).await
    }

    async fn list_for_owner(&self, owner: &UserId, page: PageRequest) -> Result<Page<Booking>, DomainError> {
        self.list_where("owner_id", owner, page).await
    }
}
