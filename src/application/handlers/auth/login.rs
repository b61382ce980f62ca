//! LoginHandler - Exchanges email and password for a bearer token.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{PasswordHasher, TokenIssuer, UserRepository};

use super::AuthSession;

#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

pub struct LoginHandler {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenIssuer>,
}

impl LoginHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    pub async fn handle(&self, cmd: LoginCommand) -> Result<AuthSession, DomainError> {
        let invalid = || DomainError::new(ErrorCode::InvalidCredentials, "Invalid email or password");

        let email = cmd.email.trim().to_lowercase();
        let user = self.users.find_by_email(&email).await?.ok_or_else(invalid)?;
        if !self.hasher.verify(&cmd.password, &user.password_hash)? {
            return Err(invalid());
        }
        if !user.email_verified {
            return Err(DomainError::new(
                ErrorCode::EmailNotVerified,
                "Please verify your email before logging in",
            ));
        }

        let token = self.tokens.issue(&user)?;
        tracing::info!(user_id = %user.id, "User logged in");
        Ok(AuthSession {
            token,
            user: user.profile(),
        })
    }
}
