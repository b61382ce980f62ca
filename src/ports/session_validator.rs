//! Session validation and token issuing ports.
//!
//! The HTTP middleware only needs [`SessionValidator`]; the auth handlers use
//! [`TokenIssuer`] after a successful login or verification.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::foundation::{AuthError, AuthenticatedUser, Timestamp};
use crate::domain::user::User;

/// Port for validating bearer tokens.
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validates a bearer token and returns the authenticated caller.
    ///
    /// # Errors
    ///
    /// - `AuthError::InvalidToken` - malformed token or bad signature
    /// - `AuthError::TokenExpired` - token past its `exp`
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}

/// Bearer token handed to a client.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: Timestamp,
}

/// Port for minting bearer tokens.
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, user: &User) -> Result<IssuedToken, AuthError>;
}
