//! User account aggregate and the validated inputs that create or change it.

use serde::Serialize;

use crate::domain::foundation::{validation, DomainError, Timestamp, UserId, UserRole, ValidationError};

/// Minimum password length in characters.
pub const PASSWORD_MIN_LEN: usize = 8;

/// Maximum password length in characters.
pub const PASSWORD_MAX_LEN: usize = 128;

/// Registered account.
///
/// # Invariants
///
/// - `email` is lower-cased and unique across accounts
/// - `password_hash` is a PHC string, never a raw password
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub role: UserRole,
    pub email_verified: bool,
    pub avatar_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Creates an unverified account with the default role.
    pub fn register(registration: &Registration, password_hash: String) -> Self {
        let now = Timestamp::now();
        Self {
            id: UserId::new(),
            name: registration.name.clone(),
            email: registration.email.clone(),
            phone: registration.phone.clone(),
            password_hash,
            role: UserRole::User,
            email_verified: false,
            avatar_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Refreshes the details of a still-unverified account that registers again.
    pub fn refresh_registration(&mut self, registration: &Registration, password_hash: String) {
        self.name = registration.name.clone();
        self.phone = registration.phone.clone();
        self.password_hash = password_hash;
        self.updated_at = Timestamp::now();
    }

    pub fn mark_verified(&mut self) {
        self.email_verified = true;
        self.updated_at = Timestamp::now();
    }

    pub fn change_password_hash(&mut self, password_hash: String) {
        self.password_hash = password_hash;
        self.updated_at = Timestamp::now();
    }

    pub fn set_role(&mut self, role: UserRole) {
        self.role = role;
        self.updated_at = Timestamp::now();
    }

    pub fn apply_profile(&mut self, update: ProfileUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(phone) = update.phone {
            self.phone = phone;
        }
        if let Some(avatar) = update.avatar_url {
            self.avatar_url = avatar;
        }
        self.updated_at = Timestamp::now();
    }

    /// Public projection returned by the API.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            role: self.role,
            email_verified: self.email_verified,
            avatar_url: self.avatar_url.clone(),
            created_at: self.created_at,
        }
    }
}

/// Account fields safe to expose to clients.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub email_verified: bool,
    pub avatar_url: Option<String>,
    pub created_at: Timestamp,
}

/// Validated registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
}

impl Registration {
    pub fn new(
        name: &str,
        email: &str,
        phone: Option<&str>,
        password: &str,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            name: validate_name(name)?,
            email: validation::email(email)?,
            phone: validation::optional_phone(phone)?,
            password: check_password_policy(password)?,
        })
    }
}

/// Partial profile change. `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub phone: Option<Option<String>>,
    pub avatar_url: Option<Option<String>>,
}

impl ProfileUpdate {
    pub fn new(
        name: Option<&str>,
        phone: Option<&str>,
        avatar_url: Option<&str>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            name: name.map(validate_name).transpose()?,
            phone: phone.map(|p| validation::optional_phone(Some(p))).transpose()?,
            avatar_url: avatar_url
                .map(|u| match u.trim() {
                    "" => Ok(None),
                    v => validation::url("avatar_url", v).map(Some),
                })
                .transpose()?,
        })
    }
}

fn validate_name(name: &str) -> Result<String, ValidationError> {
    validation::text("name", name, 2, 100)
}

/// Passwords need 8 to 128 characters with at least one letter and one digit.
pub fn check_password_policy(password: &str) -> Result<String, ValidationError> {
    let len = password.chars().count();
    if len < PASSWORD_MIN_LEN || len > PASSWORD_MAX_LEN {
        return Err(ValidationError::out_of_range(
            "password",
            PASSWORD_MIN_LEN as i64,
            PASSWORD_MAX_LEN as i64,
            len as i64,
        ));
    }
    let has_letter = password.chars().any(|c| c.is_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !has_letter || !has_digit {
        return Err(ValidationError::invalid_format(
            "password",
            "must contain at least one letter and one digit",
        ));
    }
    Ok(password.to_string())
}
