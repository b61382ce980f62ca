//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables use the `ESTATEHUB` prefix and
//! `__` between nested keys. The conventional flat names (`DATABASE_URL`,
//! `JWT_SECRET`, `PORT`, `REDIS_URL`) override their nested counterparts.
//!
//! # Example
//!
//! ```no_run
//! use estatehub::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod auth;
mod booking;
mod database;
mod email;
mod error;
mod features;
mod payment;
mod redis;
mod server;
mod storage;

pub use auth::AuthConfig;
pub use booking::{LiveGroupConfig, ShortStayConfig};
pub use database::DatabaseConfig;
pub use email::{EmailConfig, EmailProvider};
pub use error::{ConfigError, ValidationError};
pub use features::FeatureFlags;
pub use payment::{PaymentConfig, PaymentProvider};
pub use redis::RedisConfig;
pub use server::{Environment, ServerConfig};
pub use storage::{StorageConfig, StorageProvider};

use serde::Deserialize;

/// Flat variable names honoured on top of the prefixed ones.
const FLAT_OVERRIDES: &[(&str, &str)] = &[
    ("DATABASE_URL", "database.url"),
    ("JWT_SECRET", "auth.jwt_secret"),
    ("PORT", "server.port"),
    ("REDIS_URL", "redis.url"),
];

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    pub database: DatabaseConfig,

    pub auth: AuthConfig,

    #[serde(default)]
    pub email: EmailConfig,

    #[serde(default)]
    pub payment: PaymentConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    /// Optional; enables the shared rate limiter
    #[serde(default)]
    pub redis: RedisConfig,

    #[serde(default)]
    pub live_group: LiveGroupConfig,

    #[serde(default)]
    pub short_stay: ShortStayConfig,

    #[serde(default)]
    pub features: FeatureFlags,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` if present (development)
    /// 2. Reads `ESTATEHUB__SECTION__KEY` variables
    /// 3. Applies the flat overrides
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required values are missing or cannot be
    /// parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut builder = config::Config::builder().add_source(
            config::Environment::with_prefix("ESTATEHUB")
                .prefix_separator("__")
                .separator("__"),
        );
        for (var, key) in FLAT_OVERRIDES {
            builder = builder.set_override_option(*key, std::env::var(var).ok())?;
        }

        let config = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate(&self.server.environment)?;
        self.email.validate()?;
        self.payment.validate(&self.server.environment)?;
        self.storage.validate()?;
        self.redis.validate()?;
        self.live_group.validate()?;
        self.short_stay.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "ESTATEHUB__DATABASE__URL",
        "ESTATEHUB__AUTH__JWT_SECRET",
        "ESTATEHUB__SERVER__PORT",
        "ESTATEHUB__SERVER__ENVIRONMENT",
        "ESTATEHUB__LIVE_GROUP__LOCK_TTL_MINUTES",
        "DATABASE_URL",
        "JWT_SECRET",
        "PORT",
        "REDIS_URL",
    ];

    fn set_minimal_env() {
        env::set_var("ESTATEHUB__DATABASE__URL", "postgresql://test@localhost/test");
        env::set_var("ESTATEHUB__AUTH__JWT_SECRET", "dev-secret");
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.expect("config loads");
        assert_eq!(config.database.url, "postgresql://test@localhost/test");
        assert_eq!(config.auth.jwt_secret.expose_secret(), "dev-secret");
        assert_eq!(config.server.port, 5000);
        assert!(config.redis.url().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_flat_variables_override_prefixed() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        set_minimal_env();
        env::set_var("DATABASE_URL", "postgres://flat@localhost/flat");
        env::set_var("PORT", "8081");
        let result = AppConfig::load();
        clear_env();

        let config = result.expect("config loads");
        assert_eq!(config.database.url, "postgres://flat@localhost/flat");
        assert_eq!(config.server.port, 8081);
    }

    #[test]
    fn test_nested_section_values() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        set_minimal_env();
        env::set_var("ESTATEHUB__LIVE_GROUP__LOCK_TTL_MINUTES", "5");
        let result = AppConfig::load();
        clear_env();

        let config = result.expect("config loads");
        assert_eq!(config.live_group.lock_ttl_minutes, 5);
        assert_eq!(config.short_stay.hold_minutes, 30);
    }

    #[test]
    fn test_production_rejects_weak_secret() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        set_minimal_env();
        env::set_var("ESTATEHUB__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.expect("config loads");
        assert!(config.is_production());
        assert_eq!(config.validate(), Err(ValidationError::WeakJwtSecret));
    }
}
