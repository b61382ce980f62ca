//! Authentication adapters.
//!
//! - `jwt` - HS256 token issuing and validation
//! - `password` - Argon2id password hashing
//! - `mock` - Test implementations that skip signing and hashing

mod jwt;
mod mock;
mod password;

pub use jwt::JwtTokenService;
pub use mock::{MockSessionValidator, PlainPasswordHasher};
pub use password::Argon2PasswordHasher;
