//! DeleteAccountHandler - Removes an account and everything it owns.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::ports::{PasswordHasher, UserRepository};

#[derive(Debug, Clone)]
pub struct DeleteAccountCommand {
    pub user_id: UserId,
    pub password: String,
}

pub struct DeleteAccountHandler {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl DeleteAccountHandler {
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }

    pub async fn handle(&self, cmd: DeleteAccountCommand) -> Result<(), DomainError> {
        let user = self
            .users
            .find_by_id(&cmd.user_id)
            .await?
            .ok_or_else(|| DomainError::not_found(ErrorCode::UserNotFound, "User", cmd.user_id))?;

        if !self.hasher.verify(&cmd.password, &user.password_hash)? {
            return Err(DomainError::new(
                ErrorCode::InvalidCredentials,
                "Password is incorrect",
            ));
        }

        self.users.delete_cascade(&user.id).await?;
        tracing::info!(user_id = %user.id, "Account deleted");
        Ok(())
    }
}
