//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Invalid Redis URL format")]
    InvalidRedisUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("JWT secret must be at least 32 characters in production")]
    WeakJwtSecret,

    #[error("Invalid token lifetime")]
    InvalidTokenTtl,

    #[error("Invalid OTP settings")]
    InvalidOtpSettings,

    #[error("Invalid Razorpay key id format")]
    InvalidRazorpayKey,

    #[error("Mock payment provider is not allowed in production")]
    MockPaymentInProduction,

    #[error("Invalid from email address")]
    InvalidFromEmail,

    #[error("Invalid upload size limit")]
    InvalidUploadLimit,

    #[error("Invalid live-group lock settings")]
    InvalidLockSettings,

    #[error("Invalid short-stay settings")]
    InvalidShortStaySettings,
}
