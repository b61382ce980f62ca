//! Account handlers.
//!
//! ## Commands
//! - Registering and verifying an email address
//! - Issuing one-time passcodes (resend, forgot password)
//! - Logging in, resetting and changing passwords
//! - Updating the profile and deleting the account

mod change_password;
mod delete_account;
mod login;
mod register;
mod reset_password;
mod send_otp;
mod update_profile;
mod verify_email;

use serde::Serialize;

use crate::domain::user::UserProfile;
use crate::ports::IssuedToken;

pub use change_password::{ChangePasswordCommand, ChangePasswordHandler};
pub use delete_account::{DeleteAccountCommand, DeleteAccountHandler};
pub use login::{LoginCommand, LoginHandler};
pub use register::{RegisterCommand, RegisterHandler, RegisterResult};
pub use reset_password::{ResetPasswordCommand, ResetPasswordHandler};
pub use send_otp::{SendOtpCommand, SendOtpHandler};
pub use update_profile::{UpdateProfileCommand, UpdateProfileHandler};
pub use verify_email::{VerifyEmailCommand, VerifyEmailHandler};

/// Signed-in session returned by login and email verification.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    #[serde(flatten)]
    pub token: IssuedToken,
    pub user: UserProfile,
}
