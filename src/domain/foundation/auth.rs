//! Authentication types for the domain layer.
//!
//! These types represent an authenticated user extracted from a bearer token.
//! They have **no external dependencies** - the JWT adapter populates them via
//! the `SessionValidator` port.
//!
//! # Example
//!
//! ```ignore
//! // In HTTP middleware, after token validation:
//! let user = AuthenticatedUser::new(user_id, "user@example.com", "Alice", UserRole::User);
//! request.extensions_mut().insert(user);
//! ```

use super::{DomainError, ErrorCode, UserId, UserRole};
use thiserror::Error;

/// Authenticated caller extracted from a validated token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// Account identifier (`sub` claim).
    pub id: UserId,

    /// Email address from the token claims.
    pub email: String,

    /// Display name from the token claims.
    pub name: String,

    /// Role at the time the token was issued.
    pub role: UserRole,
}

impl AuthenticatedUser {
    /// Creates a new authenticated user.
    pub fn new(id: UserId, email: impl Into<String>, name: impl Into<String>, role: UserRole) -> Self {
        Self {
            id,
            email: email.into(),
            name: name.into(),
            role,
        }
    }

    /// Returns true if the caller has the admin role.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Fails with `Forbidden` unless the caller is an admin.
    pub fn require_admin(&self) -> Result<(), DomainError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(DomainError::new(ErrorCode::Forbidden, "Admin access required"))
        }
    }

    /// True if the caller is `owner` or an admin.
    pub fn can_manage(&self, owner: &UserId) -> bool {
        &self.id == owner || self.is_admin()
    }
}

/// Authentication errors that can occur during token validation.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// Token is valid but the account no longer exists.
    #[error("User not found")]
    UserNotFound,

    /// Token could not be produced or checked for infrastructure reasons.
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this error indicates the user should sign in again.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidToken | AuthError::TokenExpired | AuthError::UserNotFound
        )
    }
}

impl From<AuthError> for DomainError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::ServiceUnavailable(msg) => DomainError::new(ErrorCode::InternalError, msg),
            other => DomainError::new(ErrorCode::Unauthorized, other.to_string()),
        }
    }
}
