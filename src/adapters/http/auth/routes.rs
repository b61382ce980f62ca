use axum::{
    routing::{get, post},
    Router,
};

use super::super::state::AppState;
use super::handlers::{
    change_password, delete_me, forgot_password, login, me, register, resend_otp,
    reset_password, update_me, verify_email,
};

/// Routes mounted at `/api/auth`.
///
/// ## Public
/// - `POST /register`, `POST /verify-email`, `POST /resend-otp`
/// - `POST /login`, `POST /forgot-password`, `POST /reset-password`
///
/// ## Authenticated
/// - `GET /me`, `PATCH /me`, `DELETE /me`
/// - `POST /change-password`
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/verify-email", post(verify_email))
        .route("/resend-otp", post(resend_otp))
        .route("/login", post(login))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
        .route("/me", get(me).patch(update_me).delete(delete_me))
        .route("/change-password", post(change_password))
}
