//! ChangePasswordHandler - Replaces the password of a signed-in user.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::user::check_password_policy;
use crate::ports::{PasswordHasher, UserRepository};

#[derive(Debug, Clone)]
pub struct ChangePasswordCommand {
    pub user_id: UserId,
    pub current_password: String,
    pub new_password: String,
}

pub struct ChangePasswordHandler {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl ChangePasswordHandler {
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }

    pub async fn handle(&self, cmd: ChangePasswordCommand) -> Result<(), DomainError> {
        let new_password = check_password_policy(&cmd.new_password)?;
        let mut user = self
            .users
            .find_by_id(&cmd.user_id)
            .await?
            .ok_or_else(|| DomainError::not_found(ErrorCode::UserNotFound, "User", cmd.user_id))?;

        if !self.hasher.verify(&cmd.current_password, &user.password_hash)? {
            return Err(DomainError::new(
                ErrorCode::InvalidCredentials,
                "Current password is incorrect",
            ));
        }

        user.change_password_hash(self.hasher.hash(&new_password)?);
        self.users.update(&user).await?;
        Ok(())
    }
}
