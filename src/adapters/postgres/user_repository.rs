//! PostgreSQL implementations of UserRepository and OtpRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, Page, PageRequest, UserId};
use crate::domain::property::like_pattern;
use crate::domain::user::{OtpPurpose, OtpRecord, User};
use crate::ports::{OtpRepository, UserFilter, UserRepository};

use super::support::{db_error, is_unique_violation, parse_column, total, ts};

/// Rows removed or detached before the account row itself, in order.
///
/// Every statement takes the user id as `$1`. Foreign keys cascade as well;
/// running them explicitly keeps the order deterministic and lets the unit
/// holds be returned to sale instead of being orphaned.
const CASCADE_STATEMENTS: &[(&str, &str)] = &[
    (
        "release unit holds",
        "UPDATE live_group_units
         SET status = CASE WHEN status = 'locked' THEN 'available' ELSE status END,
             locked_by = NULL, lock_expires_at = NULL
         WHERE locked_by = $1",
    ),
    (
        "return booked units",
        "UPDATE live_group_units
         SET status = 'available', booked_by = NULL, booked_at = NULL
         WHERE status = 'booked'
           AND id IN (SELECT unit_id FROM live_group_bookings
                      WHERE user_id = $1 AND status = 'confirmed')",
    ),
    ("delete live bookings", "DELETE FROM live_group_bookings WHERE user_id = $1"),
    ("delete wishlist", "DELETE FROM wishlists WHERE user_id = $1"),
    ("delete reviews", "DELETE FROM reviews WHERE author_id = $1"),
    ("delete chats", "DELETE FROM chats WHERE buyer_id = $1 OR owner_id = $1"),
    (
        "delete site visits",
        "DELETE FROM bookings WHERE visitor_id = $1 OR owner_id = $1",
    ),
    (
        "delete reservations",
        "DELETE FROM short_stay_reservations
         WHERE guest_id = $1 OR host_id = $1
            OR listing_id IN (SELECT id FROM short_stay_properties WHERE host_id = $1)",
    ),
    ("delete stay listings", "DELETE FROM short_stay_properties WHERE host_id = $1"),
    ("delete subscriptions", "DELETE FROM subscriptions WHERE user_id = $1"),
    ("unlink leads", "UPDATE marketing_leads SET user_id = NULL WHERE user_id = $1"),
    ("delete properties", "DELETE FROM properties WHERE owner_id = $1"),
];

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    phone: Option<String>,
    password_hash: String,
    role: String,
    email_verified: bool,
    avatar_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId::from_uuid(row.id),
            name: row.name,
            email: row.email,
            phone: row.phone,
            password_hash: row.password_hash,
            role: parse_column("role", &row.role)?,
            email_verified: row.email_verified,
            avatar_url: row.avatar_url,
            created_at: ts(row.created_at),
            updated_at: ts(row.updated_at),
        })
    }
}

const USER_COLUMNS: &str = "id, name, email, phone, password_hash, role, email_verified, \
                            avatar_url, created_at, updated_at";

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: &User) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id, name, email, phone, password_hash, role, email_verified,
                avatar_url, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.email_verified)
        .bind(&user.avatar_url)
        .bind(user.created_at.as_datetime())
        .bind(user.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e, "users_email_key") {
                return DomainError::new(ErrorCode::EmailTaken, "Email is already registered");
            }
            DomainError::database("Failed to insert user", e)
        })?;

        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                name = $2,
                phone = $3,
                password_hash = $4,
                role = $5,
                email_verified = $6,
                avatar_url = $7,
                updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(&user.name)
        .bind(&user.phone)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.email_verified)
        .bind(&user.avatar_url)
        .bind(user.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to update user"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(ErrorCode::UserNotFound, "User", user.id));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error("Failed to find user"))?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS))
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error("Failed to find user by email"))?;

        row.map(User::try_from).transpose()
    }

    async fn list(&self, filter: &UserFilter, page: PageRequest) -> Result<Page<User>, DomainError> {
        let pattern = filter.q.as_deref().map(like_pattern);
        let role = filter.role.map(|r| r.as_str());
        let where_clause = "WHERE ($1::text IS NULL OR name ILIKE $1 OR email ILIKE $1)
                              AND ($2::text IS NULL OR role = $2)";

        let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM users {}", where_clause))
            .bind(&pattern)
            .bind(role)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count users"))?;

        let rows: Vec<UserRow> = sqlx::query_as(&format!(
            "SELECT {} FROM users {} ORDER BY created_at DESC LIMIT $3 OFFSET $4",
            USER_COLUMNS, where_clause
        ))
        .bind(&pattern)
        .bind(role)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list users"))?;

        let users = rows.into_iter().map(User::try_from).collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(users, total(count), page))
    }

    async fn delete_cascade(&self, id: &UserId) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        // 1. Lock the account row
        let email: Option<(String,)> =
            sqlx::query_as("SELECT email FROM users WHERE id = $1 FOR UPDATE")
                .bind(id.as_uuid())
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_error("Failed to lock user"))?;
        let Some((email,)) = email else {
            return Err(DomainError::not_found(ErrorCode::UserNotFound, "User", id));
        };

        // 2. Dependent rows; booked units go back on sale
        for (label, statement) in CASCADE_STATEMENTS {
            sqlx::query(statement)
                .bind(id.as_uuid())
                .execute(&mut *tx)
                .await
                .map_err(|e| DomainError::database(&format!("Failed to {}", label), e))?;
        }
        sqlx::query("DELETE FROM otp_codes WHERE email = $1")
            .bind(&email)
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to delete passcodes"))?;

        // 3. The account
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to delete user"))?;

        tx.commit().await.map_err(db_error("Failed to commit transaction"))?;
        Ok(())
    }
}

pub struct PostgresOtpRepository {
    pool: PgPool,
}

impl PostgresOtpRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OtpRow {
    email: String,
    purpose: String,
    code_hash: String,
    expires_at: DateTime<Utc>,
    attempts: i32,
    consumed: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<OtpRow> for OtpRecord {
    type Error = DomainError;

    fn try_from(row: OtpRow) -> Result<Self, Self::Error> {
        Ok(OtpRecord {
            email: row.email,
            purpose: parse_column("purpose", &row.purpose)?,
            code_hash: row.code_hash,
            expires_at: ts(row.expires_at),
            attempts: row.attempts.max(0) as u32,
            consumed: row.consumed,
            created_at: ts(row.created_at),
        })
    }
}

#[async_trait]
impl OtpRepository for PostgresOtpRepository {
    async fn save(&self, record: &OtpRecord) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO otp_codes (email, purpose, code_hash, expires_at, attempts, consumed, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (email, purpose) DO UPDATE SET
                code_hash = EXCLUDED.code_hash,
                expires_at = EXCLUDED.expires_at,
                attempts = EXCLUDED.attempts,
                consumed = EXCLUDED.consumed,
                created_at = EXCLUDED.created_at
            "#,
        )
        .bind(&record.email)
        .bind(record.purpose.as_str())
        .bind(&record.code_hash)
        .bind(record.expires_at.as_datetime())
        .bind(record.attempts as i32)
        .bind(record.consumed)
        .bind(record.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to save passcode"))?;

        Ok(())
    }

    async fn find(&self, email: &str, purpose: OtpPurpose) -> Result<Option<OtpRecord>, DomainError> {
        let row: Option<OtpRow> = sqlx::query_as(
            r#"
            SELECT email, purpose, code_hash, expires_at, attempts, consumed, created_at
            FROM otp_codes
            WHERE email = $1 AND purpose = $2
            "#,
        )
        .bind(email)
        .bind(purpose.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find passcode"))?;

        row.map(OtpRecord::try_from).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserRole;

    fn row(role: &str) -> UserRow {
        let now = Utc::now();
        UserRow {
            id: Uuid::new_v4(),
            name: "Asha".into(),
            email: "asha@example.com".into(),
            phone: None,
            password_hash: "$argon2id$...".into(),
            role: role.into(),
            email_verified: true,
            avatar_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn user_row_maps_role() {
        let user = User::try_from(row("admin")).unwrap();
        assert_eq!(user.role, UserRole::Admin);
        assert!(user.email_verified);
    }

    #[test]
    fn user_row_with_unknown_role_fails() {
        assert!(User::try_from(row("superuser")).is_err());
    }

    #[test]
    fn otp_row_clamps_negative_attempts() {
        let now = Utc::now();
        let record = OtpRecord::try_from(OtpRow {
            email: "a@b.in".into(),
            purpose: "reset_password".into(),
            code_hash: "abc".into(),
            expires_at: now,
            attempts: -3,
            consumed: false,
            created_at: now,
        })
        .unwrap();
        assert_eq!(record.purpose, OtpPurpose::ResetPassword);
        assert_eq!(record.attempts, 0);
    }

    #[test]
    fn cascade_leaves_the_account_row_last() {
        assert!(CASCADE_STATEMENTS
            .iter()
            .all(|(_, sql)| !sql.contains("DELETE FROM users")));
        assert_eq!(CASCADE_STATEMENTS[0].0, "release unit holds");
    }
}
