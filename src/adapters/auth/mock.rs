//! Mock authentication adapters for testing.
//!
//! `MockSessionValidator` maps fixed tokens to callers so HTTP tests can
//! authenticate without signing JWTs. `PlainPasswordHasher` skips Argon2's
//! deliberate slowness.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser, DomainError, UserId, UserRole};
use crate::ports::{PasswordHasher, SessionValidator};

/// Mock session validator for testing.
///
/// Tokens not in the map return `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockSessionValidator {
    tokens: RwLock<HashMap<String, AuthenticatedUser>>,
}

impl MockSessionValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a valid token that maps to a user.
    pub fn with_user(self, token: impl Into<String>, user: AuthenticatedUser) -> Self {
        self.tokens
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(token.into(), user);
        self
    }

    /// Adds a token for a fresh caller with the given role and returns the caller's id.
    pub fn add_caller(&self, token: impl Into<String>, role: UserRole) -> UserId {
        let id = UserId::new();
        let user = AuthenticatedUser::new(id, format!("{}@test.example.com", id), "Test User", role);
        self.tokens
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(token.into(), user);
        id
    }
}

#[async_trait]
impl SessionValidator for MockSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        self.tokens
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}

/// Reversible "hash" for tests: `plain:<password>`.
#[derive(Debug, Default, Clone)]
pub struct PlainPasswordHasher;

impl PasswordHasher for PlainPasswordHasher {
    fn hash(&self, password: &str) -> Result<String, DomainError> {
        Ok(format!("plain:{}", password))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, DomainError> {
        Ok(hash.strip_prefix("plain:") == Some(password))
    }
}
