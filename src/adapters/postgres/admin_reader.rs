//! PostgreSQL implementation of AdminReader.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, Timestamp};
use crate::ports::{AdminReader, DashboardStats};

use super::support::db_error;

#[derive(Clone)]
pub struct PostgresAdminReader {
    pool: PgPool,
}

impl PostgresAdminReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct StatsRow {
    users: i64,
    users_verified: i64,
    properties_total: i64,
    properties_pending: i64,
    properties_active: i64,
    bookings_pending: i64,
    live_projects: i64,
    units_booked: i64,
    reservations_confirmed: i64,
    active_subscriptions: i64,
    new_leads: i64,
}

impl From<StatsRow> for DashboardStats {
    fn from(row: StatsRow) -> Self {
        DashboardStats {
            users: row.users,
            users_verified: row.users_verified,
            properties_total: row.properties_total,
            properties_pending: row.properties_pending,
            properties_active: row.properties_active,
            bookings_pending: row.bookings_pending,
            live_projects: row.live_projects,
            units_booked: row.units_booked,
            reservations_confirmed: row.reservations_confirmed,
            active_subscriptions: row.active_subscriptions,
            new_leads: row.new_leads,
        }
    }
}

#[async_trait]
impl AdminReader for PostgresAdminReader {
    async fn dashboard_stats(&self, now: Timestamp) -> Result<DashboardStats, DomainError> {
        let row: StatsRow = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM users) AS users,
                (SELECT COUNT(*) FROM users WHERE email_verified) AS users_verified,
                (SELECT COUNT(*) FROM properties) AS properties_total,
                (SELECT COUNT(*) FROM properties WHERE status = 'pending_review') AS properties_pending,
                (SELECT COUNT(*) FROM properties WHERE status = 'active') AS properties_active,
                (SELECT COUNT(*) FROM bookings WHERE status = 'pending') AS bookings_pending,
                (SELECT COUNT(*) FROM live_group_projects WHERE status = 'live') AS live_projects,
                (SELECT COUNT(*) FROM live_group_units WHERE status = 'booked') AS units_booked,
                (SELECT COUNT(*) FROM short_stay_reservations WHERE status = 'confirmed')
                    AS reservations_confirmed,
                (SELECT COUNT(*) FROM subscriptions
                    WHERE status IN ('active', 'cancelled') AND (ends_at IS NULL OR ends_at > $1))
                    AS active_subscriptions,
                (SELECT COUNT(*) FROM marketing_leads WHERE status = 'new') AS new_leads
            "#,
        )
        .bind(now.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to load dashboard stats"))?;

        Ok(row.into())
    }
}
