//! HTTP handlers for `/api/admin`. Every route requires the admin role.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::application::handlers::admin::{
    ChangeUserRoleCommand, DeleteUserCommand, ListPropertiesByStatusQuery, ListUsersQuery,
};
use crate::application::handlers::property::ModeratePropertyCommand;
use crate::domain::foundation::{PageRequest, PropertyId, UserId};

use super::super::error::{ApiError, ApiJson};
use super::super::middleware::RequireAdmin;
use super::super::properties::dto::PropertyResponse;
use super::super::state::AppState;
use super::dto::{ChangeRoleRequest, ModerateRequest, PropertyListParams, UserListParams};

/// GET /api/admin/stats
pub async fn dashboard_stats(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<impl IntoResponse, ApiError> {
    let stats = state.dashboard_stats_handler().handle(&admin).await?;
    Ok(Json(stats))
}

/// GET /api/admin/users?q=&role=
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(params): Query<UserListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (filter, page) = params.into_parts();
    let users = state
        .list_users_handler()
        .handle(ListUsersQuery {
            actor: admin,
            filter,
            page,
        })
        .await?;
    Ok(Json(users))
}

/// PATCH /api/admin/users/:id/role
pub async fn change_user_role(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(user_id): Path<UserId>,
    ApiJson(req): ApiJson<ChangeRoleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = state
        .change_user_role_handler()
        .handle(ChangeUserRoleCommand {
            actor: admin,
            user_id,
            role: req.role,
        })
        .await?;
    Ok(Json(profile))
}

/// DELETE /api/admin/users/:id - same cascade as self-deletion
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(user_id): Path<UserId>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .delete_user_handler()
        .handle(DeleteUserCommand {
            actor: admin,
            user_id,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/admin/properties?status=
pub async fn list_properties(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(params): Query<PropertyListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state
        .list_properties_by_status_handler()
        .handle(ListPropertiesByStatusQuery {
            actor: admin,
            status: params.status,
            page: PageRequest::new(params.page, params.per_page),
        })
        .await?;
    Ok(Json(page.map(PropertyResponse::from)))
}

/// POST /api/admin/properties/:id/moderate - approve, reject or toggle featured
pub async fn moderate_property(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(property_id): Path<PropertyId>,
    ApiJson(req): ApiJson<ModerateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let property = state
        .moderate_property_handler()
        .handle(ModeratePropertyCommand {
            actor: admin,
            property_id,
            action: req.into(),
        })
        .await?;
    Ok(Json(PropertyResponse::from(property)))
}
