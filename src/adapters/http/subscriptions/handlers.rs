//! HTTP handlers for `/api/subscriptions`.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use crate::application::handlers::subscription::{
    CancelSubscriptionCommand, CreateSubscriptionOrderCommand, GetEntitlementQuery,
    HandlePaymentWebhookCommand, VerifySubscriptionPaymentCommand,
};
use crate::domain::subscription::Plan;

use super::super::error::{ApiError, ApiJson};
use super::super::middleware::RequireAuth;
use super::super::state::AppState;
use super::dto::{CreateOrderRequest, VerifyPaymentRequest, WebhookResponse};

/// Header carrying the webhook body signature.
pub const WEBHOOK_SIGNATURE_HEADER: &str = "x-razorpay-signature";

/// GET /api/subscriptions/plans
pub async fn list_plans() -> impl IntoResponse {
    Json(Plan::catalog())
}

/// GET /api/subscriptions/me - current plan and remaining allowances
pub async fn my_entitlement(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let entitlement = state
        .get_entitlement_handler()
        .handle(GetEntitlementQuery { user_id: user.id })
        .await?;
    Ok(Json(entitlement))
}

/// POST /api/subscriptions/orders - opens a gateway order for a paid plan
pub async fn create_order(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(req): ApiJson<CreateOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state
        .create_subscription_order_handler()
        .handle(CreateSubscriptionOrderCommand {
            user_id: user.id,
            plan: req.plan,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// POST /api/subscriptions/verify - checkout callback
pub async fn verify_payment(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(req): ApiJson<VerifyPaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let subscription = state
        .verify_subscription_payment_handler()
        .handle(VerifySubscriptionPaymentCommand {
            user_id: user.id,
            order_id: req.order_id,
            payment_id: req.payment_id,
            signature: req.signature,
        })
        .await?;
    Ok(Json(subscription))
}

/// POST /api/subscriptions/cancel
pub async fn cancel_subscription(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let subscription = state
        .cancel_subscription_handler()
        .handle(CancelSubscriptionCommand { user_id: user.id })
        .await?;
    Ok(Json(subscription))
}

/// POST /api/subscriptions/webhook - gateway events, signed over the raw body
pub async fn payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let signature = headers
        .get(WEBHOOK_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::bad_request("signature", "Missing webhook signature"))?
        .to_owned();

    let outcome = state
        .payment_webhook_handler()
        .handle(HandlePaymentWebhookCommand {
            body: body.to_vec(),
            signature,
        })
        .await?;
    tracing::info!(?outcome, "Payment webhook processed");
    Ok(Json(WebhookResponse::from(outcome)))
}
