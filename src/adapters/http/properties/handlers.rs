//! HTTP handlers for `/api/properties`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::application::handlers::property::{
    ChangePropertyStatusCommand, CreatePropertyCommand, DeletePropertyCommand, GetPropertyQuery,
    OwnerStatusAction, SearchPropertiesQuery, UpdatePropertyCommand,
};
use crate::domain::foundation::{PageQuery, PropertyId};

use super::super::error::{ApiError, ApiJson};
use super::super::middleware::{OptionalAuth, RequireAuth};
use super::super::state::AppState;
use super::dto::{PropertyRequest, PropertyResponse, SearchParams};

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/properties - public search over active listings
pub async fn search_properties(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (search, page) = params.into_parts();
    let result = state
        .search_properties_handler()
        .handle(SearchPropertiesQuery { search, page })
        .await?;
    Ok(Json(result.map(PropertyResponse::from)))
}

/// GET /api/properties/:id
pub async fn get_property(
    State(state): State<AppState>,
    OptionalAuth(viewer): OptionalAuth,
    Path(property_id): Path<PropertyId>,
) -> Result<impl IntoResponse, ApiError> {
    let property = state
        .get_property_handler()
        .handle(GetPropertyQuery {
            property_id,
            viewer,
        })
        .await?;
    Ok(Json(PropertyResponse::from(property)))
}

/// GET /api/properties/mine - the caller's listings in every status
pub async fn my_properties(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(page): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .repos
        .properties
        .list_by_owner(&user.id, page.into())
        .await?;
    Ok(Json(result.map(PropertyResponse::from)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/properties
pub async fn create_property(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(req): ApiJson<PropertyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let property = state
        .create_property_handler()
        .handle(CreatePropertyCommand {
            owner_id: user.id,
            input: req.into(),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(PropertyResponse::from(property))))
}

/// PUT /api/properties/:id
pub async fn update_property(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(property_id): Path<PropertyId>,
    ApiJson(req): ApiJson<PropertyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let property = state
        .update_property_handler()
        .handle(UpdatePropertyCommand {
            actor: user,
            property_id,
            input: req.into(),
        })
        .await?;
    Ok(Json(PropertyResponse::from(property)))
}

async fn change_status(
    state: AppState,
    cmd: ChangePropertyStatusCommand,
) -> Result<Json<PropertyResponse>, ApiError> {
    let property = state.change_property_status_handler().handle(cmd).await?;
    Ok(Json(PropertyResponse::from(property)))
}

/// POST /api/properties/:id/sold
pub async fn mark_sold(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(property_id): Path<PropertyId>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = ChangePropertyStatusCommand {
        actor: user,
        property_id,
        action: OwnerStatusAction::MarkSold,
    };
    change_status(state, cmd).await
}

/// POST /api/properties/:id/archive
pub async fn archive(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(property_id): Path<PropertyId>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = ChangePropertyStatusCommand {
        actor: user,
        property_id,
        action: OwnerStatusAction::Archive,
    };
    change_status(state, cmd).await
}

/// DELETE /api/properties/:id - owner or admin
pub async fn delete_property(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(property_id): Path<PropertyId>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .delete_property_handler()
        .handle(DeletePropertyCommand {
            actor: user,
            property_id,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
