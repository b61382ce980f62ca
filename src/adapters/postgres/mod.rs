//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! Every repository holds a cloned `PgPool`. Operations that must be atomic
//! (holds, reservations, cascades, hierarchy syncs) run inside a single
//! transaction and take row locks with `SELECT ... FOR UPDATE`.

mod admin_reader;
mod booking_repository;
mod chat_repository;
mod engagement_repository;
mod lead_repository;
mod live_group_repository;
mod property_repository;
mod short_stay_repository;
mod subscription_repository;
mod support;
mod user_repository;

pub use admin_reader::PostgresAdminReader;
pub use booking_repository::PostgresBookingRepository;
pub use chat_repository::PostgresChatRepository;
pub use engagement_repository::{PostgresReviewRepository, PostgresWishlistRepository};
pub use lead_repository::PostgresLeadRepository;
pub use live_group_repository::PostgresLiveGroupRepository;
pub use property_repository::PostgresPropertyRepository;
pub use short_stay_repository::{PostgresReservationRepository, PostgresStayListingRepository};
pub use subscription_repository::PostgresSubscriptionRepository;
pub use user_repository::{PostgresOtpRepository, PostgresUserRepository};

use sqlx::migrate::Migrator;
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::DatabaseConfig;

/// Schema migrations embedded at compile time.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Opens the pool and, when configured, applies pending migrations.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(config.idle_timeout())
        .connect(&config.url)
        .await?;

    if config.run_migrations {
        MIGRATOR.run(&pool).await?;
        tracing::info!("Database migrations applied");
    }
    Ok(pool)
}
