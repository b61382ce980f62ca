//! HTTP handlers for `/api/auth`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::application::handlers::auth::{
    ChangePasswordCommand, DeleteAccountCommand, LoginCommand, RegisterCommand,
    ResetPasswordCommand, SendOtpCommand, UpdateProfileCommand, VerifyEmailCommand,
};
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::user::OtpPurpose;

use super::super::error::{ApiError, ApiJson};
use super::super::middleware::RequireAuth;
use super::super::state::AppState;
use super::dto::{
    ChangePasswordRequest, DeleteAccountRequest, ForgotPasswordRequest, LoginRequest,
    MessageResponse, RegisterRequest, RegisterResponse, ResendOtpRequest, ResetPasswordRequest,
    UpdateProfileRequest, VerifyEmailRequest,
};

/// Same reply whether or not the address is known.
const CODE_SENT: &str = "If the account exists, a code has been sent to the email address";

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = RegisterCommand {
        name: req.name,
        email: req.email,
        phone: req.phone,
        password: req.password,
    };
    let result = state.register_handler().handle(cmd).await?;

    let status = if result.resumed {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((
        status,
        Json(RegisterResponse {
            message: "Verification code sent to your email".to_string(),
            user: result.user,
        }),
    ))
}

/// POST /api/auth/verify-email
pub async fn verify_email(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<VerifyEmailRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state
        .verify_email_handler()
        .handle(VerifyEmailCommand {
            email: req.email,
            code: req.code,
        })
        .await?;
    Ok(Json(session))
}

/// POST /api/auth/resend-otp
pub async fn resend_otp(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ResendOtpRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = SendOtpCommand {
        email: req.email,
        purpose: req.purpose.unwrap_or(OtpPurpose::VerifyEmail),
    };
    state.send_otp_handler().handle(cmd).await?;
    Ok(Json(MessageResponse::new(CODE_SENT)))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state
        .login_handler()
        .handle(LoginCommand {
            email: req.email,
            password: req.password,
        })
        .await?;
    Ok(Json(session))
}

/// POST /api/auth/forgot-password
pub async fn forgot_password(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ForgotPasswordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = SendOtpCommand {
        email: req.email,
        purpose: OtpPurpose::ResetPassword,
    };
    state.send_otp_handler().handle(cmd).await?;
    Ok(Json(MessageResponse::new(CODE_SENT)))
}

/// POST /api/auth/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ResetPasswordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = ResetPasswordCommand {
        email: req.email,
        code: req.code,
        new_password: req.new_password,
    };
    state.reset_password_handler().handle(cmd).await?;
    Ok(Json(MessageResponse::new("Password updated. You can now sign in")))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let account = state
        .repos
        .users
        .find_by_id(&user.id)
        .await?
        .ok_or_else(|| DomainError::not_found(ErrorCode::UserNotFound, "User", user.id))?;
    Ok(Json(account.profile()))
}

/// PATCH /api/auth/me
pub async fn update_me(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(req): ApiJson<UpdateProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = UpdateProfileCommand {
        user_id: user.id,
        name: req.name,
        phone: req.phone,
        avatar_url: req.avatar_url,
    };
    let profile = state.update_profile_handler().handle(cmd).await?;
    Ok(Json(profile))
}

/// POST /api/auth/change-password
pub async fn change_password(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(req): ApiJson<ChangePasswordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = ChangePasswordCommand {
        user_id: user.id,
        current_password: req.current_password,
        new_password: req.new_password,
    };
    state.change_password_handler().handle(cmd).await?;
    Ok(Json(MessageResponse::new("Password changed")))
}

/// DELETE /api/auth/me
pub async fn delete_me(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(req): ApiJson<DeleteAccountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = DeleteAccountCommand {
        user_id: user.id,
        password: req.password,
    };
    state.delete_account_handler().handle(cmd).await?;
    Ok(StatusCode::NO_CONTENT)
}
