//! Fixtures shared by handler tests.

use crate::adapters::memory::InMemoryStore;
use crate::domain::foundation::{AuthError, AuthenticatedUser, Timestamp, UserRole};
use crate::domain::property::{sample_input, Property};
use crate::domain::user::{Registration, User};
use crate::ports::{IssuedToken, PropertyRepository, TokenIssuer, UserRepository};

/// Password of every fixture account.
pub const PASSWORD: &str = "flat2024";

/// Issues `token-<user id>` so tests can assert on the subject.
pub struct StaticTokens;

impl TokenIssuer for StaticTokens {
    fn issue(&self, user: &User) -> Result<IssuedToken, AuthError> {
        Ok(IssuedToken {
            token: format!("token-{}", user.id),
            expires_at: Timestamp::now().add_days(1),
        })
    }
}

pub async fn unverified_user(store: &InMemoryStore, email: &str) -> User {
    let name = email.split('@').next().unwrap_or("user");
    let registration = Registration::new(&format!("{} tester", name), email, None, PASSWORD).unwrap();
    let user = User::register(&registration, format!("plain:{}", PASSWORD));
    UserRepository::create(store, &user).await.unwrap();
    user
}

pub async fn verified_user(store: &InMemoryStore, email: &str) -> User {
    let mut user = unverified_user(store, email).await;
    user.mark_verified();
    UserRepository::update(store, &user).await.unwrap();
    user
}

pub async fn admin_user(store: &InMemoryStore) -> User {
    let mut user = verified_user(store, "admin@estatehub.test").await;
    user.set_role(UserRole::Admin);
    UserRepository::update(store, &user).await.unwrap();
    user
}

pub fn caller(user: &User) -> AuthenticatedUser {
    AuthenticatedUser::new(user.id, user.email.clone(), user.name.clone(), user.role)
}

/// Approved listing owned by `owner`.
pub async fn active_property(store: &InMemoryStore, owner: &User) -> Property {
    let mut property = Property::create(owner.id, sample_input().validate().unwrap());
    property.approve().unwrap();
    PropertyRepository::create(store, &property).await.unwrap();
    property
}
