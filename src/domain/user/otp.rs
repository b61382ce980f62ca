//! One-time passcodes for email verification and password reset.
//!
//! Codes are six random digits. Only the SHA-256 hex digest is stored; the raw
//! code leaves the process once, inside the email.

use rand::Rng;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::domain::foundation::{string_enum, DomainError, ErrorCode, Timestamp};

string_enum! {
    /// What a passcode authorizes.
    pub enum OtpPurpose {
        VerifyEmail => "verify_email",
        ResetPassword => "reset_password",
    }
}

/// Freshly generated code; `code` must only be sent to the account's inbox.
#[derive(Debug, Clone)]
pub struct IssuedOtp {
    pub code: String,
    pub record: OtpRecord,
}

/// Stored passcode state for one email and purpose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpRecord {
    pub email: String,
    pub purpose: OtpPurpose,
    pub code_hash: String,
    pub expires_at: Timestamp,
    pub attempts: u32,
    pub consumed: bool,
    pub created_at: Timestamp,
}

/// Why a submitted passcode was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OtpError {
    #[error("No active code for this email")]
    Missing,
    #[error("Code has expired")]
    Expired,
    #[error("Code has already been used")]
    Consumed,
    #[error("Too many incorrect attempts")]
    TooManyAttempts,
    #[error("Incorrect code")]
    Mismatch,
}

impl From<OtpError> for DomainError {
    fn from(err: OtpError) -> Self {
        let code = match err {
            OtpError::Expired | OtpError::TooManyAttempts => ErrorCode::OtpExpired,
            OtpError::Missing | OtpError::Consumed | OtpError::Mismatch => ErrorCode::OtpInvalid,
        };
        DomainError::new(code, err.to_string())
    }
}

impl OtpRecord {
    /// Generates a new code valid for `ttl_minutes`.
    pub fn issue(email: &str, purpose: OtpPurpose, ttl_minutes: i64) -> IssuedOtp {
        let code = format!("{:06}", rand::thread_rng().gen_range(0..1_000_000u32));
        let now = Timestamp::now();
        IssuedOtp {
            record: OtpRecord {
                email: email.to_string(),
                purpose,
                code_hash: hash_code(&code),
                expires_at: now.plus_minutes(ttl_minutes),
                attempts: 0,
                consumed: false,
                created_at: now,
            },
            code,
        }
    }

    /// Checks `code` and consumes the record on success.
    ///
    /// Every wrong guess increments `attempts`, so callers must persist the
    /// record whatever the outcome.
    pub fn verify(&mut self, code: &str, now: Timestamp, max_attempts: u32) -> Result<(), OtpError> {
        if self.consumed {
            return Err(OtpError::Consumed);
        }
        if now.is_after(&self.expires_at) {
            return Err(OtpError::Expired);
        }
        if self.attempts >= max_attempts {
            return Err(OtpError::TooManyAttempts);
        }
        let submitted = hash_code(code.trim());
        if submitted.as_bytes().ct_eq(self.code_hash.as_bytes()).into() {
            self.consumed = true;
            Ok(())
        } else {
            self.attempts += 1;
            Err(OtpError::Mismatch)
        }
    }
}

/// SHA-256 hex digest of a code.
pub fn hash_code(code: &str) -> String {
    hex::encode(Sha256::digest(code.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issued() -> IssuedOtp {
        OtpRecord::issue("asha@example.com", OtpPurpose::VerifyEmail, 10)
    }

    #[test]
    fn code_is_six_digits_and_not_stored_raw() {
        let otp = issued();
        assert_eq!(otp.code.len(), 6);
        assert!(otp.code.chars().all(|c| c.is_ascii_digit()));
        assert_ne!(otp.record.code_hash, otp.code);
        assert_eq!(otp.record.code_hash, hash_code(&otp.code));
    }

    #[test]
    fn correct_code_consumes_record() {
        let IssuedOtp { code, mut record } = issued();
        assert!(record.verify(&code, Timestamp::now(), 5).is_ok());
        assert!(record.consumed);
        assert_eq!(record.verify(&code, Timestamp::now(), 5), Err(OtpError::Consumed));
    }

    #[test]
    fn wrong_code_counts_attempts_until_locked() {
        let IssuedOtp { code, mut record } = issued();
        let wrong = if code == "000000" { "111111" } else { "000000" };
        for _ in 0..3 {
            assert_eq!(record.verify(wrong, Timestamp::now(), 3), Err(OtpError::Mismatch));
        }
        assert_eq!(record.verify(&code, Timestamp::now(), 3), Err(OtpError::TooManyAttempts));
    }

    #[test]
    fn expired_code_is_refused() {
        let IssuedOtp { code, mut record } = issued();
        let later = Timestamp::now().plus_minutes(11);
        assert_eq!(record.verify(&code, later, 5), Err(OtpError::Expired));
    }

    #[test]
    fn errors_map_to_otp_codes() {
        assert_eq!(DomainError::from(OtpError::Expired).code, ErrorCode::OtpExpired);
        assert_eq!(DomainError::from(OtpError::Mismatch).code, ErrorCode::OtpInvalid);
    }
}
