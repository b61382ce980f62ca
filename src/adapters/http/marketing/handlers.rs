//! HTTP handlers for `/api/marketing`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::application::handlers::marketing::{
    ListLeadsQuery, NewsletterCommand, SubmitLeadCommand, UpdateLeadCommand,
};
use crate::domain::foundation::LeadId;

use super::super::error::{ApiError, ApiJson};
use super::super::middleware::{OptionalAuth, RequireAdmin};
use super::super::state::AppState;
use super::dto::{
    LeadListParams, LeadReceipt, LeadRequest, NewsletterRequest, NewsletterResponse,
    UpdateLeadRequest,
};

/// POST /api/marketing/leads - public; links the lead to the caller when signed in
pub async fn submit_lead(
    State(state): State<AppState>,
    OptionalAuth(viewer): OptionalAuth,
    ApiJson(req): ApiJson<LeadRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let lead = state
        .submit_lead_handler()
        .handle(SubmitLeadCommand {
            input: req.into(),
            user_id: viewer.map(|v| v.id),
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(LeadReceipt {
            id: lead.id,
            message: "Thanks! Our team will get in touch shortly.",
        }),
    ))
}

/// POST /api/marketing/newsletter/subscribe
pub async fn subscribe(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NewsletterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let changed = state
        .newsletter_handler()
        .handle(NewsletterCommand::Subscribe { email: req.email })
        .await?;
    Ok(Json(NewsletterResponse {
        subscribed: true,
        changed,
    }))
}

/// POST /api/marketing/newsletter/unsubscribe
pub async fn unsubscribe(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NewsletterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let changed = state
        .newsletter_handler()
        .handle(NewsletterCommand::Unsubscribe { email: req.email })
        .await?;
    Ok(Json(NewsletterResponse {
        subscribed: false,
        changed,
    }))
}

/// GET /api/marketing/admin/leads?status=&source=
pub async fn list_leads(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(params): Query<LeadListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (filter, page) = params.into_parts();
    let leads = state
        .list_leads_handler()
        .handle(ListLeadsQuery {
            actor: admin,
            filter,
            page,
        })
        .await?;
    Ok(Json(leads))
}

/// PATCH /api/marketing/admin/leads/:id
pub async fn update_lead(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(lead_id): Path<LeadId>,
    ApiJson(req): ApiJson<UpdateLeadRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let lead = state
        .update_lead_handler()
        .handle(UpdateLeadCommand {
            actor: admin,
            lead_id,
            status: req.status,
            notes: req.notes,
        })
        .await?;
    Ok(Json(lead))
}
