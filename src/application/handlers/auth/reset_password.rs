//! ResetPasswordHandler - Sets a new password using a reset passcode.

use std::sync::Arc;

use crate::domain::foundation::{validation, DomainError, Timestamp};
use crate::domain::user::{check_password_policy, OtpError, OtpPurpose};
use crate::ports::{OtpRepository, PasswordHasher, UserRepository};

#[derive(Debug, Clone)]
pub struct ResetPasswordCommand {
    pub email: String,
    pub code: String,
    pub new_password: String,
}

pub struct ResetPasswordHandler {
    users: Arc<dyn UserRepository>,
    otps: Arc<dyn OtpRepository>,
    hasher: Arc<dyn PasswordHasher>,
    max_attempts: u32,
}

impl ResetPasswordHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        otps: Arc<dyn OtpRepository>,
        hasher: Arc<dyn PasswordHasher>,
        max_attempts: u32,
    ) -> Self {
        Self {
            users,
            otps,
            hasher,
            max_attempts,
        }
    }

    pub async fn handle(&self, cmd: ResetPasswordCommand) -> Result<(), DomainError> {
        let email = validation::email(&cmd.email)?;
        let new_password = check_password_policy(&cmd.new_password)?;

        let mut record = self
            .otps
            .find(&email, OtpPurpose::ResetPassword)
            .await?
            .ok_or(OtpError::Missing)?;
        let outcome = record.verify(&cmd.code, Timestamp::now(), self.max_attempts);
        self.otps.save(&record).await?;
        outcome?;

        let mut user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(OtpError::Missing)?;
        user.change_password_hash(self.hasher.hash(&new_password)?);
        // Receiving the code proves control of the inbox.
        if !user.email_verified {
            user.mark_verified();
        }
        self.users.update(&user).await?;

        tracing::info!(user_id = %user.id, "Password reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::PlainPasswordHasher;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::test_support::verified_user;
    use crate::domain::foundation::ErrorCode;
    use crate::domain::user::OtpRecord;

    #[tokio::test]
    async fn valid_code_changes_password() {
        let store = InMemoryStore::new();
        let user = verified_user(&store, "asha@example.com").await;
        let issued = OtpRecord::issue(&user.email, OtpPurpose::ResetPassword, 10);
        OtpRepository::save(&store, &issued.record).await.unwrap();
        let shared = Arc::new(store.clone());
        let handler = ResetPasswordHandler::new(shared.clone(), shared, Arc::new(PlainPasswordHasher), 5);

        handler
            .handle(ResetPasswordCommand {
                email: user.email.clone(),
                code: issued.code,
                new_password: "newflat2025".into(),
            })
            .await
            .unwrap();

        let updated = UserRepository::find_by_id(&store, &user.id).await.unwrap().unwrap();
        assert_eq!(updated.password_hash, "plain:newflat2025");
    }

    #[tokio::test]
    async fn missing_code_is_invalid() {
        let store = InMemoryStore::new();
        let user = verified_user(&store, "asha@example.com").await;
        let shared = Arc::new(store.clone());
        let handler = ResetPasswordHandler::new(shared.clone(), shared, Arc::new(PlainPasswordHasher), 5);

        let err = handler
            .handle(ResetPasswordCommand {
                email: user.email,
                code: "123456".into(),
                new_password: "newflat2025".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::OtpInvalid);
    }
}
