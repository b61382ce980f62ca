//! HTTP handlers for `/api/live-grouping`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::application::handlers::live_group::{
    BookUnitCommand, CancelLiveBookingCommand, ChangeProjectStatusCommand, CreateProjectCommand,
    DeleteProjectCommand, GetProjectQuery, ListProjectBookingsQuery, ListProjectsQuery,
    LockUnitCommand, MyLiveGroupQuery, ReleaseUnitCommand, SyncHierarchyCommand,
    UpdateProjectCommand,
};
use crate::domain::foundation::{LiveBookingId, ProjectId, Timestamp, UnitId};
use crate::domain::live_group::DesiredTower;

use super::super::error::{ApiError, ApiJson};
use super::super::middleware::{OptionalAuth, RequireAdmin, RequireAuth};
use super::super::state::AppState;
use super::dto::{
    BookUnitRequest, HierarchyRequest, MyLiveGroupResponse, ProjectCardResponse,
    ProjectDetailResponse, ProjectRequest, ProjectResponse, ProjectStatusRequest,
    UnitStateResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Public
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/live-grouping/projects - live and closed projects with progress
pub async fn list_projects(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let cards = state
        .list_projects_handler()
        .handle(ListProjectsQuery::default())
        .await?;
    let body: Vec<ProjectCardResponse> = cards.into_iter().map(Into::into).collect();
    Ok(Json(body))
}

/// GET /api/live-grouping/projects/:id - project with its full tower tree
pub async fn get_project(
    State(state): State<AppState>,
    OptionalAuth(viewer): OptionalAuth,
    Path(project_id): Path<ProjectId>,
) -> Result<impl IntoResponse, ApiError> {
    let viewer_id = viewer.as_ref().map(|v| v.id);
    let view = state
        .get_project_handler()
        .handle(GetProjectQuery { project_id, viewer })
        .await?;
    Ok(Json(ProjectDetailResponse::render(
        view,
        viewer_id.as_ref(),
        Timestamp::now(),
    )))
}

// ════════════════════════════════════════════════════════════════════════════════
// Buyers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/live-grouping/units/:id/lock
pub async fn lock_unit(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(unit_id): Path<UnitId>,
) -> Result<impl IntoResponse, ApiError> {
    let unit = state
        .lock_unit_handler()
        .handle(LockUnitCommand {
            user_id: user.id,
            unit_id,
        })
        .await?;
    Ok(Json(UnitStateResponse::from(unit)))
}

/// DELETE /api/live-grouping/units/:id/lock
pub async fn release_unit(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(unit_id): Path<UnitId>,
) -> Result<impl IntoResponse, ApiError> {
    let unit = state
        .release_unit_handler()
        .handle(ReleaseUnitCommand {
            user_id: user.id,
            unit_id,
        })
        .await?;
    Ok(Json(UnitStateResponse::from(unit)))
}

/// POST /api/live-grouping/units/:id/book - converts the caller's hold
pub async fn book_unit(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(unit_id): Path<UnitId>,
    body: Option<ApiJson<BookUnitRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let req = body.map(|ApiJson(r)| r).unwrap_or_default();
    let booking = state
        .book_unit_handler()
        .handle(BookUnitCommand {
            user_id: user.id,
            unit_id,
            payment_reference: req.payment_reference,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// GET /api/live-grouping/me - the caller's live holds and bookings
pub async fn my_live_group(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let mine = state
        .my_live_group_handler()
        .handle(MyLiveGroupQuery { user_id: user.id })
        .await?;
    Ok(Json(MyLiveGroupResponse::from(mine)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Admin
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/live-grouping/admin/projects - every project including drafts
pub async fn admin_list_projects(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<impl IntoResponse, ApiError> {
    let cards = state
        .list_projects_handler()
        .handle(ListProjectsQuery {
            include_drafts: true,
            viewer: Some(admin),
        })
        .await?;
    let body: Vec<ProjectCardResponse> = cards.into_iter().map(Into::into).collect();
    Ok(Json(body))
}

/// POST /api/live-grouping/admin/projects
pub async fn create_project(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiJson(req): ApiJson<ProjectRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let project = state
        .create_project_handler()
        .handle(CreateProjectCommand {
            actor: admin,
            input: req.into(),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ProjectResponse::from(project))))
}

/// PUT /api/live-grouping/admin/projects/:id
pub async fn update_project(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(project_id): Path<ProjectId>,
    ApiJson(req): ApiJson<ProjectRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let project = state
        .update_project_handler()
        .handle(UpdateProjectCommand {
            actor: admin,
            project_id,
            input: req.into(),
        })
        .await?;
    Ok(Json(ProjectResponse::from(project)))
}

/// DELETE /api/live-grouping/admin/projects/:id - refused while bookings exist
pub async fn delete_project(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(project_id): Path<ProjectId>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .delete_project_handler()
        .handle(DeleteProjectCommand {
            actor: admin,
            project_id,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/live-grouping/admin/projects/:id/status
pub async fn change_project_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(project_id): Path<ProjectId>,
    ApiJson(req): ApiJson<ProjectStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let project = state
        .change_project_status_handler()
        .handle(ChangeProjectStatusCommand {
            actor: admin,
            project_id,
            status: req.status,
        })
        .await?;
    Ok(Json(ProjectResponse::from(project)))
}

/// PUT /api/live-grouping/admin/projects/:id/hierarchy - bulk tower/unit sync
pub async fn sync_hierarchy(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(project_id): Path<ProjectId>,
    ApiJson(req): ApiJson<HierarchyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let towers: Vec<DesiredTower> = req.towers.into_iter().map(Into::into).collect();
    let outcome = state
        .sync_hierarchy_handler()
        .handle(SyncHierarchyCommand {
            actor: admin,
            project_id,
            expected_version: req.expected_version,
            towers,
        })
        .await?;
    Ok(Json(outcome))
}

/// GET /api/live-grouping/admin/projects/:id/bookings
pub async fn project_bookings(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(project_id): Path<ProjectId>,
) -> Result<impl IntoResponse, ApiError> {
    let bookings = state
        .list_project_bookings_handler()
        .handle(ListProjectBookingsQuery {
            actor: admin,
            project_id,
        })
        .await?;
    Ok(Json(bookings))
}

/// POST /api/live-grouping/admin/bookings/:id/cancel - unit returns to available
pub async fn cancel_booking(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(booking_id): Path<LiveBookingId>,
) -> Result<impl IntoResponse, ApiError> {
    let booking = state
        .cancel_live_booking_handler()
        .handle(CancelLiveBookingCommand {
            actor: admin,
            booking_id,
        })
        .await?;
    Ok(Json(booking))
}
