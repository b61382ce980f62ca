//! PostgreSQL implementations of the short-stay ports.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{
    DomainError, ErrorCode, ListingId, Page, PageRequest, ReservationId, Timestamp, UserId,
};
use crate::domain::property::like_pattern;
use crate::domain::short_stay::{
    reservation_changed, Reservation, ReservationStatus, StayDates, StayListing,
    StayListingDetails,
};
use crate::ports::{ReservationRepository, StayListingRepository, StaySearch};

use super::support::{db_error, opt_dt, opt_ts, parse_column, total, ts};

pub struct PostgresStayListingRepository {
    pool: PgPool,
}

impl PostgresStayListingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub struct PostgresReservationRepository {
    pool: PgPool,
}

impl PostgresReservationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ListingRow {
    id: Uuid,
    host_id: Uuid,
    title: String,
    description: String,
    city: String,
    address: String,
    nightly_rate: i64,
    cleaning_fee: i64,
    max_guests: i32,
    min_nights: i32,
    max_nights: i32,
    amenities: Vec<String>,
    images: Vec<String>,
    house_rules: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ListingRow> for StayListing {
    type Error = DomainError;

    fn try_from(row: ListingRow) -> Result<Self, Self::Error> {
        Ok(StayListing {
            id: ListingId::from_uuid(row.id),
            host_id: UserId::from_uuid(row.host_id),
            details: StayListingDetails {
                title: row.title,
                description: row.description,
                city: row.city,
                address: row.address,
                nightly_rate: row.nightly_rate,
                cleaning_fee: row.cleaning_fee,
                max_guests: row.max_guests,
                min_nights: row.min_nights,
                max_nights: row.max_nights,
                amenities: row.amenities,
                images: row.images,
                house_rules: row.house_rules,
            },
            status: parse_column("status", &row.status)?,
            created_at: ts(row.created_at),
            updated_at: ts(row.updated_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ReservationRow {
    id: Uuid,
    listing_id: Uuid,
    guest_id: Uuid,
    host_id: Uuid,
    check_in: NaiveDate,
    check_out: NaiveDate,
    guests: i32,
    nightly_rate: i64,
    cleaning_fee: i64,
    total: i64,
    status: String,
    hold_expires_at: Option<DateTime<Utc>>,
    payment_order_id: Option<String>,
    payment_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ReservationRow> for Reservation {
    type Error = DomainError;

    fn try_from(row: ReservationRow) -> Result<Self, Self::Error> {
        let dates = StayDates::new(row.check_in, row.check_out).map_err(|_| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid stay dates on reservation {}", row.id),
            )
        })?;
        Ok(Reservation {
            id: ReservationId::from_uuid(row.id),
            listing_id: ListingId::from_uuid(row.listing_id),
            guest_id: UserId::from_uuid(row.guest_id),
            host_id: UserId::from_uuid(row.host_id),
            dates,
            guests: row.guests,
            nightly_rate: row.nightly_rate,
            cleaning_fee: row.cleaning_fee,
            total: row.total,
            status: parse_column("status", &row.status)?,
            hold_expires_at: opt_ts(row.hold_expires_at),
            payment_order_id: row.payment_order_id,
            payment_id: row.payment_id,
            created_at: ts(row.created_at),
            updated_at: ts(row.updated_at),
        })
    }
}

const LISTING_COLUMNS: &str = "l.id, l.host_id, l.title, l.description, l.city, l.address, \
    l.nightly_rate, l.cleaning_fee, l.max_guests, l.min_nights, l.max_nights, l.amenities, \
    l.images, l.house_rules, l.status, l.created_at, l.updated_at";

const RESERVATION_COLUMNS: &str = "id, listing_id, guest_id, host_id, check_in, check_out, \
    guests, nightly_rate, cleaning_fee, total, status, hold_expires_at, payment_order_id, \
    payment_id, created_at, updated_at";

/// Binds $1-$6: city pattern, guests, max rate, check-in, check-out, now.
///
/// A reservation blocks its nights when confirmed, or pending with a live hold.
const SEARCH_FILTER: &str = r#"
    WHERE l.status = 'active'
      AND ($1::text IS NULL OR l.city ILIKE $1)
      AND ($2::bigint IS NULL OR l.max_guests >= $2)
      AND ($3::bigint IS NULL OR l.nightly_rate <= $3)
      AND ($4::date IS NULL OR NOT EXISTS (
          SELECT 1 FROM short_stay_reservations r
          WHERE r.listing_id = l.id
            AND r.check_in < $5 AND $4 < r.check_out
            AND (r.status = 'confirmed' OR (r.status = 'pending' AND r.hold_expires_at > $6))
      ))
"#;

fn into_reservations(rows: Vec<ReservationRow>) -> Result<Vec<Reservation>, DomainError> {
    rows.into_iter().map(Reservation::try_from).collect()
}

#[async_trait]
impl StayListingRepository for PostgresStayListingRepository {
    async fn create(&self, listing: &StayListing) -> Result<(), DomainError> {
        let d = &listing.details;
        sqlx::query(
            r#"
            INSERT INTO short_stay_properties (
                id, host_id, title, description, city, address, nightly_rate, cleaning_fee,
                max_guests, min_nights, max_nights, amenities, images, house_rules, status,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            "#,
        )
        .bind(listing.id.as_uuid())
        .bind(listing.host_id.as_uuid())
        .bind(&d.title)
        .bind(&d.description)
        .bind(&d.city)
        .bind(&d.address)
        .bind(d.nightly_rate)
        .bind(d.cleaning_fee)
        .bind(d.max_guests)
        .bind(d.min_nights)
        .bind(d.max_nights)
        .bind(&d.amenities)
        .bind(&d.images)
        .bind(&d.house_rules)
        .bind(listing.status.as_str())
        .bind(listing.created_at.as_datetime())
        .bind(listing.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to insert listing"))?;

        Ok(())
    }

    async fn update(&self, listing: &StayListing) -> Result<(), DomainError> {
        let d = &listing.details;
        let result = sqlx::query(
            r#"
            UPDATE short_stay_properties SET
                title = $2,
                description = $3,
                city = $4,
                address = $5,
                nightly_rate = $6,
                cleaning_fee = $7,
                max_guests = $8,
                min_nights = $9,
                max_nights = $10,
                amenities = $11,
                images = $12,
                house_rules = $13,
                status = $14,
                updated_at = $15
            WHERE id = $1
            "#,
        )
        .bind(listing.id.as_uuid())
        .bind(&d.title)
        .bind(&d.description)
        .bind(&d.city)
        .bind(&d.address)
        .bind(d.nightly_rate)
        .bind(d.cleaning_fee)
        .bind(d.max_guests)
        .bind(d.min_nights)
        .bind(d.max_nights)
        .bind(&d.amenities)
        .bind(&d.images)
        .bind(&d.house_rules)
        .bind(listing.status.as_str())
        .bind(listing.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to update listing"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(
                ErrorCode::ListingNotFound,
                "Listing",
                listing.id,
            ));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &ListingId) -> Result<Option<StayListing>, DomainError> {
        let row: Option<ListingRow> = sqlx::query_as(&format!(
            "SELECT {} FROM short_stay_properties l WHERE l.id = $1",
            LISTING_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find listing"))?;

        row.map(StayListing::try_from).transpose()
    }

    async fn search(
        &self,
        search: &StaySearch,
        now: Timestamp,
        page: PageRequest,
    ) -> Result<Page<StayListing>, DomainError> {
        let city = search.city.as_deref().map(like_pattern);
        let check_in = search.dates.map(|d| d.check_in);
        let check_out = search.dates.map(|d| d.check_out);

        let (count,): (i64,) = sqlx::query_as(&format!(
            "SELECT COUNT(*) FROM short_stay_properties l {}",
            SEARCH_FILTER
        ))
        .bind(&city)
        .bind(search.guests)
        .bind(search.max_rate)
        .bind(check_in)
        .bind(check_out)
        .bind(now.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to count listings"))?;

        let rows: Vec<ListingRow> = sqlx::query_as(&format!(
            "SELECT {} FROM short_stay_properties l {} \
             ORDER BY l.created_at DESC LIMIT $7 OFFSET $8",
            LISTING_COLUMNS, SEARCH_FILTER
        ))
        .bind(&city)
        .bind(search.guests)
        .bind(search.max_rate)
        .bind(check_in)
        .bind(check_out)
        .bind(now.as_datetime())
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to search listings"))?;

        let listings = rows
            .into_iter()
            .map(StayListing::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(listings, total(count), page))
    }

    async fn list_by_host(&self, host: &UserId) -> Result<Vec<StayListing>, DomainError> {
        let rows: Vec<ListingRow> = sqlx::query_as(&format!(
            "SELECT {} FROM short_stay_properties l WHERE l.host_id = $1 ORDER BY l.created_at DESC",
            LISTING_COLUMNS
        ))
        .bind(host.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list listings"))?;

        rows.into_iter().map(StayListing::try_from).collect()
    }

    async fn delete(&self, id: &ListingId, today: NaiveDate) -> Result<bool, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        let found: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM short_stay_properties WHERE id = $1 FOR UPDATE")
                .bind(id.as_uuid())
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_error("Failed to lock listing"))?;
        if found.is_none() {
            return Ok(false);
        }

        let (upcoming,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM short_stay_reservations
                WHERE listing_id = $1 AND status = 'confirmed' AND check_out > $2
            )
            "#,
        )
        .bind(id.as_uuid())
        .bind(today)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error("Failed to check reservations"))?;
        if upcoming {
            return Err(DomainError::new(
                ErrorCode::Conflict,
                "Listing has upcoming confirmed reservations",
            ));
        }

        sqlx::query("DELETE FROM short_stay_properties WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to delete listing"))?;

        tx.commit().await.map_err(db_error("Failed to commit transaction"))?;
        Ok(true)
    }
}

#[async_trait]
impl ReservationRepository for PostgresReservationRepository {
    async fn reserve(&self, reservation: &Reservation, now: Timestamp) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        let listing: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM short_stay_properties WHERE id = $1 FOR UPDATE")
                .bind(reservation.listing_id.as_uuid())
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_error("Failed to lock listing"))?;
        if listing.is_none() {
            return Err(DomainError::not_found(
                ErrorCode::ListingNotFound,
                "Listing",
                reservation.listing_id,
            ));
        }

        let conflict: Option<(NaiveDate,)> = sqlx::query_as(
            r#"
            SELECT check_in FROM short_stay_reservations
            WHERE listing_id = $1
              AND check_in < $3 AND $2 < check_out
              AND (status = 'confirmed' OR (status = 'pending' AND hold_expires_at > $4))
            ORDER BY check_in
            LIMIT 1
            "#,
        )
        .bind(reservation.listing_id.as_uuid())
        .bind(reservation.dates.check_in)
        .bind(reservation.dates.check_out)
        .bind(now.as_datetime())
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error("Failed to check availability"))?;

        if let Some((check_in,)) = conflict {
            return Err(DomainError::new(
                ErrorCode::DatesUnavailable,
                "Selected dates are no longer available",
            )
            .with_detail("conflicting_check_in", check_in.to_string()));
        }

        sqlx::query(
            r#"
            INSERT INTO short_stay_reservations (
                id, listing_id, guest_id, host_id, check_in, check_out, guests, nightly_rate,
                cleaning_fee, total, status, hold_expires_at, payment_order_id, payment_id,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(reservation.id.as_uuid())
        .bind(reservation.listing_id.as_uuid())
        .bind(reservation.guest_id.as_uuid())
        .bind(reservation.host_id.as_uuid())
        .bind(reservation.dates.check_in)
        .bind(reservation.dates.check_out)
        .bind(reservation.guests)
        .bind(reservation.nightly_rate)
        .bind(reservation.cleaning_fee)
        .bind(reservation.total)
        .bind(reservation.status.as_str())
        .bind(opt_dt(&reservation.hold_expires_at))
        .bind(&reservation.payment_order_id)
        .bind(&reservation.payment_id)
        .bind(reservation.created_at.as_datetime())
        .bind(reservation.updated_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(db_error("Failed to insert reservation"))?;

        tx.commit().await.map_err(db_error("Failed to commit transaction"))?;
        Ok(())
    }

    async fn update(
        &self,
        reservation: &Reservation,
        expected: ReservationStatus,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE short_stay_reservations SET
                status = $2,
                hold_expires_at = $3,
                payment_order_id = $4,
                payment_id = $5,
                updated_at = $6
            WHERE id = $1
              AND status = $7
              AND (status <> 'pending' OR $2 = 'cancelled' OR hold_expires_at > $6)
            "#,
        )
        .bind(reservation.id.as_uuid())
        .bind(reservation.status.as_str())
        .bind(opt_dt(&reservation.hold_expires_at))
        .bind(&reservation.payment_order_id)
        .bind(&reservation.payment_id)
        .bind(reservation.updated_at.as_datetime())
        .bind(expected.as_str())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to update reservation"))?;

        if result.rows_affected() == 1 {
            return Ok(());
        }

        let exists: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM short_stay_reservations WHERE id = $1")
                .bind(reservation.id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error("Failed to find reservation"))?;
        match exists {
            Some(_) => Err(reservation_changed()),
            None => Err(DomainError::not_found(
                ErrorCode::ReservationNotFound,
                "Reservation",
                reservation.id,
            )),
        }
    }

    async fn find_by_id(&self, id: &ReservationId) -> Result<Option<Reservation>, DomainError> {
        let row: Option<ReservationRow> = sqlx::query_as(&format!(
            "SELECT {} FROM short_stay_reservations WHERE id = $1",
            RESERVATION_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find reservation"))?;

        row.map(Reservation::try_from).transpose()
    }

    async fn find_by_order_id(&self, order_id: &str) -> Result<Option<Reservation>, DomainError> {
        let row: Option<ReservationRow> = sqlx::query_as(&format!(
            "SELECT {} FROM short_stay_reservations WHERE payment_order_id = $1",
            RESERVATION_COLUMNS
        ))
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find reservation"))?;

        row.map(Reservation::try_from).transpose()
    }

    async fn list_for_guest(&self, guest: &UserId) -> Result<Vec<Reservation>, DomainError> {
        let rows: Vec<ReservationRow> = sqlx::query_as(&format!(
            "SELECT {} FROM short_stay_reservations WHERE guest_id = $1 ORDER BY created_at DESC",
            RESERVATION_COLUMNS
        ))
        .bind(guest.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list reservations"))?;

        into_reservations(rows)
    }

    async fn list_for_host(&self, host: &UserId) -> Result<Vec<Reservation>, DomainError> {
        let rows: Vec<ReservationRow> = sqlx::query_as(&format!(
            "SELECT {} FROM short_stay_reservations WHERE host_id = $1 ORDER BY created_at DESC",
            RESERVATION_COLUMNS
        ))
        .bind(host.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list reservations"))?;

        into_reservations(rows)
    }

    async fn blocked_ranges(
        &self,
        listing: &ListingId,
        from: NaiveDate,
        now: Timestamp,
    ) -> Result<Vec<StayDates>, DomainError> {
        let rows: Vec<(NaiveDate, NaiveDate)> = sqlx::query_as(
            r#"
            SELECT check_in, check_out FROM short_stay_reservations
            WHERE listing_id = $1
              AND check_out > $2
              AND (status = 'confirmed' OR (status = 'pending' AND hold_expires_at > $3))
            ORDER BY check_in
            "#,
        )
        .bind(listing.as_uuid())
        .bind(from)
        .bind(now.as_datetime())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to load calendar"))?;

        // The table CHECK guarantees check_out > check_in.
        Ok(rows
            .into_iter()
            .map(|(check_in, check_out)| StayDates { check_in, check_out })
            .collect())
    }

    async fn expire_stale_holds(&self, now: Timestamp) -> Result<u64, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE short_stay_reservations SET status = 'cancelled', updated_at = $1
            WHERE status = 'pending' AND (hold_expires_at IS NULL OR hold_expires_at <= $1)
            "#,
        )
        .bind(now.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to expire reservation holds"))?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::short_stay::ReservationStatus;

    fn reservation_row(check_in: NaiveDate, check_out: NaiveDate) -> ReservationRow {
        let now = Utc::now();
        ReservationRow {
            id: Uuid::new_v4(),
            listing_id: Uuid::new_v4(),
            guest_id: Uuid::new_v4(),
            host_id: Uuid::new_v4(),
            check_in,
            check_out,
            guests: 2,
            nightly_rate: 4500,
            cleaning_fee: 500,
            total: 9500,
            status: "pending".into(),
            hold_expires_at: Some(now),
            payment_order_id: Some("order_1".into()),
            payment_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn reservation_row_maps_dates_and_status() {
        let check_in = NaiveDate::from_ymd_opt(2025, 12, 20).unwrap();
        let check_out = NaiveDate::from_ymd_opt(2025, 12, 22).unwrap();
        let reservation = Reservation::try_from(reservation_row(check_in, check_out)).unwrap();
        assert_eq!(reservation.dates.nights(), 2);
        assert_eq!(reservation.status, ReservationStatus::Pending);
        assert_eq!(reservation.payment_order_id.as_deref(), Some("order_1"));
    }

    #[test]
    fn inverted_dates_are_a_database_error() {
        let day = NaiveDate::from_ymd_opt(2025, 12, 20).unwrap();
        let err = Reservation::try_from(reservation_row(day, day)).unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }
}
