//! Password hashing port.

use crate::domain::foundation::DomainError;

/// Port for one-way password hashing.
///
/// Implementations are CPU-bound and synchronous.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password into a self-describing string.
    fn hash(&self, password: &str) -> Result<String, DomainError>;

    /// Returns `Ok(false)` for a wrong password and `Err` only for a corrupt hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, DomainError>;
}
