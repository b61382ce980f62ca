//! User and passcode persistence ports.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, Page, PageRequest, UserId, UserRole};
use crate::domain::user::{OtpPurpose, OtpRecord, User};

/// Filter for the admin user list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    /// Case-insensitive match on name or email.
    pub q: Option<String>,
    pub role: Option<UserRole>,
}

/// Repository port for accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a new account.
    ///
    /// # Errors
    ///
    /// - `EmailTaken` if the email is already registered
    async fn create(&self, user: &User) -> Result<(), DomainError>;

    /// Persists every mutable field of an existing account.
    async fn update(&self, user: &User) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Looks up by already-normalized email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    async fn list(&self, filter: &UserFilter, page: PageRequest) -> Result<Page<User>, DomainError>;

    /// Removes the account and everything that references it in one transaction.
    ///
    /// Wishlists, reviews, chat, site-visit bookings, reservations, live-group
    /// holds, subscriptions, passcodes, owned listings and short-stay listings
    /// go with it; leads are unlinked rather than deleted.
    async fn delete_cascade(&self, id: &UserId) -> Result<(), DomainError>;
}

/// Repository port for one-time passcodes. One live record per email and purpose.
#[async_trait]
pub trait OtpRepository: Send + Sync {
    /// Inserts or replaces the record for `(email, purpose)`.
    async fn save(&self, record: &OtpRecord) -> Result<(), DomainError>;

    async fn find(&self, email: &str, purpose: OtpPurpose) -> Result<Option<OtpRecord>, DomainError>;
}
