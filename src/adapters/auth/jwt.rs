//! HS256 bearer tokens.
//!
//! Tokens carry the caller's identity and role so request handling never
//! needs a database round trip to authenticate.

use async_trait::async_trait;
use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthError, AuthenticatedUser, Timestamp, UserId, UserRole};
use crate::domain::user::User;
use crate::ports::{IssuedToken, SessionValidator, TokenIssuer};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    name: String,
    role: String,
    iss: String,
    iat: u64,
    exp: u64,
}

/// Issues and validates HS256 JWTs with a shared secret.
pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    ttl: Duration,
}

impl JwtTokenService {
    pub fn new(secret: &SecretString, issuer: impl Into<String>, ttl_hours: i64) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            issuer: issuer.into(),
            ttl: Duration::hours(ttl_hours),
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation
    }
}

impl TokenIssuer for JwtTokenService {
    fn issue(&self, user: &User) -> Result<IssuedToken, AuthError> {
        let now = Timestamp::now();
        let expires_at = Timestamp::from_datetime(*now.as_datetime() + self.ttl);
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role.as_str().to_string(),
            iss: self.issuer.clone(),
            iat: now.as_unix_secs(),
            exp: expires_at.as_unix_secs(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|e| {
            tracing::error!("Failed to sign token: {}", e);
            AuthError::service_unavailable("token signing failed")
        })?;
        Ok(IssuedToken { token, expires_at })
    }
}

#[async_trait]
impl SessionValidator for JwtTokenService {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation()).map_err(|e| {
            use jsonwebtoken::errors::ErrorKind;
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => {
                    tracing::debug!("Token validation failed: {}", e);
                    AuthError::InvalidToken
                }
            }
        })?;
        let claims = data.claims;
        let id: UserId = claims.sub.parse().map_err(|_| AuthError::InvalidToken)?;
        let role: UserRole = claims.role.parse().map_err(|_| AuthError::InvalidToken)?;
        Ok(AuthenticatedUser::new(id, claims.email, claims.name, role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::Registration;

    fn service(ttl_hours: i64) -> JwtTokenService {
        JwtTokenService::new(&SecretString::new("test-secret".to_string()), "estatehub", ttl_hours)
    }

    fn user() -> User {
        let reg = Registration::new("Asha Rao", "asha@example.com", None, "secret123").unwrap();
        User::register(&reg, "hash".to_string())
    }

    #[tokio::test]
    async fn issued_token_round_trips_identity() {
        let svc = service(1);
        let user = user();
        let issued = svc.issue(&user).unwrap();

        let caller = svc.validate(&issued.token).await.unwrap();
        assert_eq!(caller.id, user.id);
        assert_eq!(caller.email, "asha@example.com");
        assert_eq!(caller.role, UserRole::User);
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let svc = service(-1);
        let issued = svc.issue(&user()).unwrap();
        let err = svc.validate(&issued.token).await.unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired));
    }

    #[tokio::test]
    async fn token_from_other_secret_is_rejected() {
        let other = JwtTokenService::new(&SecretString::new("other".to_string()), "estatehub", 1);
        let issued = other.issue(&user()).unwrap();
        let err = service(1).validate(&issued.token).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn token_from_other_issuer_is_rejected() {
        let other = JwtTokenService::new(&SecretString::new("test-secret".to_string()), "someone-else", 1);
        let issued = other.issue(&user()).unwrap();
        assert!(service(1).validate(&issued.token).await.is_err());
    }

    #[tokio::test]
    async fn garbage_is_rejected() {
        assert!(matches!(
            service(1).validate("not-a-jwt").await,
            Err(AuthError::InvalidToken)
        ));
    }
}
