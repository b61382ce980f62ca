//! RegisterHandler - Creates an unverified account and emails a passcode.

use std::sync::Arc;

use crate::application::Notifier;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::notification;
use crate::domain::user::{OtpPurpose, OtpRecord, Registration, User, UserProfile};
use crate::ports::{OtpRepository, PasswordHasher, UserRepository};

#[derive(Debug, Clone)]
pub struct RegisterCommand {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct RegisterResult {
    pub user: UserProfile,
    /// True when an unverified account was refreshed instead of created.
    pub resumed: bool,
}

pub struct RegisterHandler {
    users: Arc<dyn UserRepository>,
    otps: Arc<dyn OtpRepository>,
    hasher: Arc<dyn PasswordHasher>,
    notifier: Notifier,
    otp_ttl_minutes: i64,
}

impl RegisterHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        otps: Arc<dyn OtpRepository>,
        hasher: Arc<dyn PasswordHasher>,
        notifier: Notifier,
        otp_ttl_minutes: i64,
    ) -> Self {
        Self {
            users,
            otps,
            hasher,
            notifier,
            otp_ttl_minutes,
        }
    }

    pub async fn handle(&self, cmd: RegisterCommand) -> Result<RegisterResult, DomainError> {
        let registration =
            Registration::new(&cmd.name, &cmd.email, cmd.phone.as_deref(), &cmd.password)?;
        let password_hash = self.hasher.hash(&registration.password)?;

        // 1. Verified owners keep their email; unverified registrations are refreshed
        let (user, resumed) = match self.users.find_by_email(&registration.email).await? {
            Some(existing) if existing.email_verified => {
                return Err(DomainError::new(
                    ErrorCode::EmailTaken,
                    "An account with this email already exists",
                ));
            }
            Some(mut existing) => {
                existing.refresh_registration(&registration, password_hash);
                self.users.update(&existing).await?;
                (existing, true)
            }
            None => {
                let user = User::register(&registration, password_hash);
                self.users.create(&user).await?;
                (user, false)
            }
        };

        // 2. Fresh passcode replaces any earlier one
        let issued = OtpRecord::issue(&user.email, OtpPurpose::VerifyEmail, self.otp_ttl_minutes);
        self.otps.save(&issued.record).await?;

        self.notifier.dispatch(notification::verification_otp(
            self.notifier.branding(),
            &user.email,
            &user.name,
            &issued.code,
            self.otp_ttl_minutes,
        ));

        tracing::info!(user_id = %user.id, resumed, "Account registered");
        Ok(RegisterResult {
            user: user.profile(),
            resumed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::PlainPasswordHasher;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::notifier::tests::{recording_notifier, settle};

    fn handler(store: &InMemoryStore) -> (RegisterHandler, Arc<crate::adapters::email::RecordingEmailSender>) {
        let (notifier, sender) = recording_notifier();
        let store = Arc::new(store.clone());
        (
            RegisterHandler::new(store.clone(), store, Arc::new(PlainPasswordHasher), notifier, 10),
            sender,
        )
    }

    fn command(email: &str) -> RegisterCommand {
        RegisterCommand {
            name: "Asha Rao".into(),
            email: email.into(),
            phone: Some("+919876543210".into()),
            password: "flat2024".into(),
        }
    }

    #[tokio::test]
    async fn creates_unverified_user_and_sends_code() {
        let store = InMemoryStore::new();
        let (handler, sender) = handler(&store);

        let result = handler.handle(command("Asha@Example.com")).await.unwrap();

        assert_eq!(result.user.email, "asha@example.com");
        assert!(!result.user.email_verified);
        assert!(!result.resumed);
        let otp = OtpRepository::find(&store, "asha@example.com", OtpPurpose::VerifyEmail)
            .await
            .unwrap();
        assert!(otp.is_some());
        settle().await;
        assert_eq!(sender.sent().len(), 1);
    }

    #[tokio::test]
    async fn unverified_email_can_register_again() {
        let store = InMemoryStore::new();
        let (handler, _) = handler(&store);
        handler.handle(command("asha@example.com")).await.unwrap();

        let mut again = command("asha@example.com");
        again.name = "Asha R".into();
        let result = handler.handle(again).await.unwrap();

        assert!(result.resumed);
        assert_eq!(result.user.name, "Asha R");
    }

    #[tokio::test]
    async fn verified_email_is_taken() {
        let store = InMemoryStore::new();
        let (handler, _) = handler(&store);
        let first = handler.handle(command("asha@example.com")).await.unwrap();
        let mut user = UserRepository::find_by_id(&store, &first.user.id)
            .await
            .unwrap()
            .unwrap();
        user.mark_verified();
        UserRepository::update(&store, &user).await.unwrap();

        let err = handler.handle(command("asha@example.com")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::EmailTaken);
    }

    #[tokio::test]
    async fn weak_password_is_rejected() {
        let store = InMemoryStore::new();
        let (handler, _) = handler(&store);
        let mut cmd = command("asha@example.com");
        cmd.password = "short".into();
        let err = handler.handle(cmd).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}
