//! User accounts and one-time passcodes.

mod account;
mod otp;

pub use account::{
    check_password_policy, ProfileUpdate, Registration, User, UserProfile, PASSWORD_MAX_LEN,
    PASSWORD_MIN_LEN,
};
pub use otp::{hash_code, IssuedOtp, OtpError, OtpPurpose, OtpRecord};
