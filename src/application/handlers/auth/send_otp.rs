//! SendOtpHandler - Issues a passcode for resend and forgot-password flows.
//!
//! Always succeeds from the caller's point of view so the endpoints cannot be
//! used to discover which emails have accounts.

use std::sync::Arc;

use crate::application::Notifier;
use crate::domain::foundation::{validation, DomainError};
use crate::domain::notification;
use crate::domain::user::{OtpPurpose, OtpRecord};
use crate::ports::{OtpRepository, UserRepository};

#[derive(Debug, Clone)]
pub struct SendOtpCommand {
    pub email: String,
    pub purpose: OtpPurpose,
}

pub struct SendOtpHandler {
    users: Arc<dyn UserRepository>,
    otps: Arc<dyn OtpRepository>,
    notifier: Notifier,
    otp_ttl_minutes: i64,
}

impl SendOtpHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        otps: Arc<dyn OtpRepository>,
        notifier: Notifier,
        otp_ttl_minutes: i64,
    ) -> Self {
        Self {
            users,
            otps,
            notifier,
            otp_ttl_minutes,
        }
    }

    /// Returns whether a code was actually sent. HTTP callers ignore the flag.
    pub async fn handle(&self, cmd: SendOtpCommand) -> Result<bool, DomainError> {
        let email = match validation::email(&cmd.email) {
            Ok(email) => email,
            Err(_) => return Ok(false),
        };
        let user = match self.users.find_by_email(&email).await? {
            Some(user) => user,
            None => return Ok(false),
        };
        if cmd.purpose == OtpPurpose::VerifyEmail && user.email_verified {
            return Ok(false);
        }

        let issued = OtpRecord::issue(&user.email, cmd.purpose, self.otp_ttl_minutes);
        self.otps.save(&issued.record).await?;

        let brand = self.notifier.branding();
        let message = match cmd.purpose {
            OtpPurpose::VerifyEmail => notification::verification_otp(
                brand,
                &user.email,
                &user.name,
                &issued.code,
                self.otp_ttl_minutes,
            ),
            OtpPurpose::ResetPassword => notification::password_reset_otp(
                brand,
                &user.email,
                &user.name,
                &issued.code,
                self.otp_ttl_minutes,
            ),
        };
        self.notifier.dispatch(message);
        tracing::debug!(user_id = %user.id, purpose = %cmd.purpose, "Passcode issued");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::test_support::{unverified_user, verified_user};
    use crate::application::notifier::tests::recording_notifier;

    fn handler(store: &InMemoryStore) -> SendOtpHandler {
        let (notifier, _) = recording_notifier();
        let store = Arc::new(store.clone());
        SendOtpHandler::new(store.clone(), store, notifier, 10)
    }

    #[tokio::test]
    async fn unknown_email_is_silently_ignored() {
        let store = InMemoryStore::new();
        let sent = handler(&store)
            .handle(SendOtpCommand {
                email: "ghost@example.com".into(),
                purpose: OtpPurpose::ResetPassword,
            })
            .await
            .unwrap();
        assert!(!sent);
    }

    #[tokio::test]
    async fn verified_account_gets_no_verification_code() {
        let store = InMemoryStore::new();
        let user = verified_user(&store, "asha@example.com").await;
        let sent = handler(&store)
            .handle(SendOtpCommand {
                email: user.email,
                purpose: OtpPurpose::VerifyEmail,
            })
            .await
            .unwrap();
        assert!(!sent);
    }

    #[tokio::test]
    async fn reset_code_is_stored() {
        let store = InMemoryStore::new();
        let user = unverified_user(&store, "asha@example.com").await;
        assert!(handler(&store)
            .handle(SendOtpCommand {
                email: user.email.clone(),
                purpose: OtpPurpose::ResetPassword,
            })
            .await
            .unwrap());
        assert!(OtpRepository::find(&store, &user.email, OtpPurpose::ResetPassword)
            .await
            .unwrap()
            .is_some());
    }
}
