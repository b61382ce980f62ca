//! VerifyEmailHandler - Confirms a registration passcode and signs the user in.

use std::sync::Arc;

use crate::application::Notifier;
use crate::domain::foundation::{validation, DomainError, Timestamp};
use crate::domain::notification;
use crate::domain::user::{OtpError, OtpPurpose};
use crate::ports::{OtpRepository, TokenIssuer, UserRepository};

use super::AuthSession;

#[derive(Debug, Clone)]
pub struct VerifyEmailCommand {
    pub email: String,
    pub code: String,
}

pub struct VerifyEmailHandler {
    users: Arc<dyn UserRepository>,
    otps: Arc<dyn OtpRepository>,
    tokens: Arc<dyn TokenIssuer>,
    notifier: Notifier,
    max_attempts: u32,
}

impl VerifyEmailHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        otps: Arc<dyn OtpRepository>,
        tokens: Arc<dyn TokenIssuer>,
        notifier: Notifier,
        max_attempts: u32,
    ) -> Self {
        Self {
            users,
            otps,
            tokens,
            notifier,
            max_attempts,
        }
    }

    pub async fn handle(&self, cmd: VerifyEmailCommand) -> Result<AuthSession, DomainError> {
        let email = validation::email(&cmd.email)?;

        let mut record = self
            .otps
            .find(&email, OtpPurpose::VerifyEmail)
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
        let first_verification = !user.email_verified;
        if first_verification {
            user.mark_verified();
            self.users.update(&user).await?;
            self.notifier.dispatch(notification::welcome(
                self.notifier.branding(),
                &user.email,
                &user.name,
            ));
        }

        let token = self.tokens.issue(&user)?;
        tracing::info!(user_id = %user.id, "Email verified");
        Ok(AuthSession {
            token,
            user: user.profile(),
        })
    }
}
