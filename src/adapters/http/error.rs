//! HTTP error mapping.
//!
//! Every handler returns `Result<_, ApiError>`. The body is always
//! `{ "code": "...", "message": "...", "details": {...} }` with the status
//! derived from the [`ErrorCode`].

use std::collections::HashMap;

use async_trait::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use once_cell::sync::OnceCell;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::foundation::{AuthError, DomainError, ErrorCode, ValidationError};

static VERBOSE_ERRORS: OnceCell<bool> = OnceCell::new();

/// Exposes internal error messages in responses. Set once at startup.
pub fn set_verbose_errors(enabled: bool) {
    let _ = VERBOSE_ERRORS.set(enabled);
}

fn verbose_errors() -> bool {
    VERBOSE_ERRORS.get().copied().unwrap_or(false)
}

/// JSON error body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub details: HashMap<String, String>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: HashMap::new(),
        }
    }
}

/// Error returned by every REST handler.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl ApiError {
    pub fn bad_request(field: &str, message: impl Into<String>) -> Self {
        Self(DomainError::validation(field, message))
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self(DomainError::new(ErrorCode::Unauthorized, message))
    }

    pub fn status(&self) -> StatusCode {
        status_for(self.0.code)
    }
}

/// HTTP status for a domain error code.
pub fn status_for(code: ErrorCode) -> StatusCode {
    use ErrorCode::*;
    match code {
        ValidationFailed | OtpInvalid | OtpExpired | PaymentVerificationFailed => {
            StatusCode::BAD_REQUEST
        }
        Unauthorized | InvalidCredentials => StatusCode::UNAUTHORIZED,
        Forbidden | EmailNotVerified | ListingLimitReached => StatusCode::FORBIDDEN,
        NotFound | UserNotFound | PropertyNotFound | BookingNotFound | ProjectNotFound
        | UnitNotFound | ListingNotFound | ReservationNotFound | ConversationNotFound
        | ReviewNotFound | SubscriptionNotFound | LeadNotFound => StatusCode::NOT_FOUND,
        Conflict | EmailTaken | InvalidStateTransition | UnitUnavailable | LockExpired
        | LockLimitReached | VersionConflict | ProtectedUnits | DatesUnavailable => {
            StatusCode::CONFLICT
        }
        RateLimited => StatusCode::TOO_MANY_REQUESTS,
        ExternalServiceError => StatusCode::BAD_GATEWAY,
        DatabaseError | InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self(err.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request("body", rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let DomainError {
            code,
            message,
            details,
        } = self.0;

        let body = if code.is_internal() {
            tracing::error!(code = %code, error = %message, "Request failed");
            if verbose_errors() {
                ErrorResponse {
                    code: code.to_string(),
                    message,
                    details,
                }
            } else {
                ErrorResponse::new(code.to_string(), "An internal error occurred")
            }
        } else {
            ErrorResponse {
                code: code.to_string(),
                message,
                details,
            }
        };

        (status, Json(body)).into_response()
    }
}

/// `Json` extractor whose rejection uses the standard error body.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(ApiJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn booking_conflicts_map_to_409() {
        for code in [
            ErrorCode::VersionConflict,
            ErrorCode::ProtectedUnits,
            ErrorCode::DatesUnavailable,
            ErrorCode::EmailTaken,
        ] {
            assert_eq!(status_for(code), StatusCode::CONFLICT, "{}", code);
        }
    }

    #[test]
    fn auth_codes_map_to_401_and_403() {
        assert_eq!(status_for(ErrorCode::InvalidCredentials), StatusCode::UNAUTHORIZED);
        assert_eq!(status_for(ErrorCode::EmailNotVerified), StatusCode::FORBIDDEN);
        assert_eq!(status_for(ErrorCode::Forbidden), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn body_carries_code_message_and_details() {
        let err = DomainError::new(ErrorCode::ProtectedUnits, "Booked units cannot change")
            .with_detail("unit_ids", "a,b");
        let response = ApiError::from(err).into_response();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let json = body_json(response).await;
        assert_eq!(json["code"], "PROTECTED_UNITS");
        assert_eq!(json["message"], "Booked units cannot change");
        assert_eq!(json["details"]["unit_ids"], "a,b");
    }

    #[tokio::test]
    async fn internal_messages_are_hidden_by_default() {
        let err = DomainError::database("Failed to insert", "connection reset");
        let response = ApiError::from(err).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["code"], "DATABASE_ERROR");
        assert_eq!(json["message"], "An internal error occurred");
    }

    #[test]
    fn validation_errors_become_400() {
        let err = ApiError::from(ValidationError::empty_field("title"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.0.details.get("field").map(String::as_str), Some("title"));
    }
}
