//! PostgreSQL implementation of SubscriptionRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, SubscriptionId, Timestamp, UserId};
use crate::domain::subscription::Subscription;
use crate::ports::SubscriptionRepository;

use super::support::{db_error, opt_dt, opt_ts, parse_column, ts};

pub struct PostgresSubscriptionRepository {
    pool: PgPool,
}

impl PostgresSubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SubscriptionRow {
    id: Uuid,
    user_id: Uuid,
    plan: String,
    status: String,
    amount: i64,
    gateway_order_id: Option<String>,
    gateway_payment_id: Option<String>,
    starts_at: Option<DateTime<Utc>>,
    ends_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    cancelled_at: Option<DateTime<Utc>>,
}

impl TryFrom<SubscriptionRow> for Subscription {
    type Error = DomainError;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        Ok(Subscription {
            id: SubscriptionId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            plan: parse_column("plan", &row.plan)?,
            status: parse_column("status", &row.status)?,
            amount: row.amount,
            gateway_order_id: row.gateway_order_id,
            gateway_payment_id: row.gateway_payment_id,
            starts_at: opt_ts(row.starts_at),
            ends_at: opt_ts(row.ends_at),
            created_at: ts(row.created_at),
            updated_at: ts(row.updated_at),
            cancelled_at: opt_ts(row.cancelled_at),
        })
    }
}

const SUBSCRIPTION_COLUMNS: &str = "id, user_id, plan, status, amount, gateway_order_id, \
    gateway_payment_id, starts_at, ends_at, created_at, updated_at, cancelled_at";

/// Statuses with access, matching `SubscriptionStatus::has_access`.
const HAS_ACCESS: &str = "status IN ('active', 'cancelled')";

fn update_query(subscription: &Subscription) -> sqlx::query::Query<'static, sqlx::Postgres, sqlx::postgres::PgArguments> {
    sqlx::query(
        r#"
        UPDATE subscriptions SET
            status = $2,
            gateway_order_id = $3,
            gateway_payment_id = $4,
            starts_at = $5,
            ends_at = $6,
            updated_at = $7,
            cancelled_at = $8
        WHERE id = $1
        "#,
    )
    .bind(*subscription.id.as_uuid())
    .bind(subscription.status.as_str())
    .bind(subscription.gateway_order_id.clone())
    .bind(subscription.gateway_payment_id.clone())
    .bind(opt_dt(&subscription.starts_at))
    .bind(opt_dt(&subscription.ends_at))
    .bind(*subscription.updated_at.as_datetime())
    .bind(opt_dt(&subscription.cancelled_at))
}

fn not_found(subscription: &Subscription) -> DomainError {
    DomainError::not_found(
        ErrorCode::SubscriptionNotFound,
        "Subscription",
        subscription.id,
    )
}

#[async_trait]
impl SubscriptionRepository for PostgresSubscriptionRepository {
    async fn create(&self, subscription: &Subscription) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO subscriptions (
                id, user_id, plan, status, amount, gateway_order_id, gateway_payment_id,
                starts_at, ends_at, created_at, updated_at, cancelled_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(subscription.id.as_uuid())
        .bind(subscription.user_id.as_uuid())
        .bind(subscription.plan.as_str())
        .bind(subscription.status.as_str())
        .bind(subscription.amount)
        .bind(&subscription.gateway_order_id)
        .bind(&subscription.gateway_payment_id)
        .bind(opt_dt(&subscription.starts_at))
        .bind(opt_dt(&subscription.ends_at))
        .bind(subscription.created_at.as_datetime())
        .bind(subscription.updated_at.as_datetime())
        .bind(opt_dt(&subscription.cancelled_at))
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to insert subscription"))?;

        Ok(())
    }

    async fn update(&self, subscription: &Subscription) -> Result<(), DomainError> {
        let result = update_query(subscription)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to update subscription"))?;

        if result.rows_affected() == 0 {
            return Err(not_found(subscription));
        }
        Ok(())
    }

    async fn find_by_order_id(&self, order_id: &str) -> Result<Option<Subscription>, DomainError> {
        let row: Option<SubscriptionRow> = sqlx::query_as(&format!(
            "SELECT {} FROM subscriptions WHERE gateway_order_id = $1",
            SUBSCRIPTION_COLUMNS
        ))
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find subscription"))?;

        row.map(Subscription::try_from).transpose()
    }

    async fn find_current(&self, user: &UserId, now: Timestamp) -> Result<Option<Subscription>, DomainError> {
        let row: Option<SubscriptionRow> = sqlx::query_as(&format!(
            "SELECT {} FROM subscriptions \
             WHERE user_id = $1 AND {} AND (ends_at IS NULL OR ends_at > $2) \
             ORDER BY starts_at DESC NULLS LAST LIMIT 1",
            SUBSCRIPTION_COLUMNS, HAS_ACCESS
        ))
        .bind(user.as_uuid())
        .bind(now.as_datetime())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find current subscription"))?;

        row.map(Subscription::try_from).transpose()
    }

    async fn list_for_user(&self, user: &UserId) -> Result<Vec<Subscription>, DomainError> {
        let rows: Vec<SubscriptionRow> = sqlx::query_as(&format!(
            "SELECT {} FROM subscriptions WHERE user_id = $1 ORDER BY created_at DESC",
            SUBSCRIPTION_COLUMNS
        ))
        .bind(user.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list subscriptions"))?;

        rows.into_iter().map(Subscription::try_from).collect()
    }

    async fn activate_superseding(&self, subscription: &Subscription) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        sqlx::query(&format!(
            "UPDATE subscriptions SET status = 'expired', updated_at = NOW() \
             WHERE user_id = $1 AND id <> $2 AND {}",
            HAS_ACCESS
        ))
        .bind(subscription.user_id.as_uuid())
        .bind(subscription.id.as_uuid())
        .execute(&mut *tx)
        .await
        .map_err(db_error("Failed to expire superseded subscriptions"))?;

        let result = update_query(subscription)
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to activate subscription"))?;
        if result.rows_affected() == 0 {
            return Err(not_found(subscription));
        }

        tx.commit().await.map_err(db_error("Failed to commit transaction"))?;
        Ok(())
    }

    async fn expire_lapsed(&self, now: Timestamp) -> Result<u64, DomainError> {
        let result = sqlx::query(&format!(
            "UPDATE subscriptions SET status = 'expired', updated_at = $1 \
             WHERE {} AND ends_at IS NOT NULL AND ends_at <= $1",
            HAS_ACCESS
        ))
        .bind(now.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to expire subscriptions"))?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::subscription::{PlanCode, SubscriptionStatus};

    #[test]
    fn row_maps_optional_periods() {
        let now = Utc::now();
        let subscription = Subscription::try_from(SubscriptionRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            plan: "premium".into(),
            status: "cancelled".into(),
            amount: 2999,
            gateway_order_id: Some("order_X".into()),
            gateway_payment_id: Some("pay_X".into()),
            starts_at: Some(now),
            ends_at: None,
            created_at: now,
            updated_at: now,
            cancelled_at: Some(now),
        })
        .unwrap();
        assert_eq!(subscription.plan, PlanCode::Premium);
        assert_eq!(subscription.status, SubscriptionStatus::Cancelled);
        assert!(subscription.is_current(Timestamp::now()));
    }
}
