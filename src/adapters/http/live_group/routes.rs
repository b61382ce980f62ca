use axum::{
    routing::{get, post, put},
    Router,
};

use super::super::state::AppState;
use super::handlers::{
    admin_list_projects, book_unit, cancel_booking, change_project_status, create_project,
    delete_project, get_project, list_projects, lock_unit, my_live_group, project_bookings,
    release_unit, sync_hierarchy, update_project,
};

/// Routes mounted at `/api/live-grouping`.
pub fn live_group_routes() -> Router<AppState> {
    Router::new()
        .route("/projects", get(list_projects))
        .route("/projects/:id", get(get_project))
        .route("/units/:id/lock", post(lock_unit).delete(release_unit))
        .route("/units/:id/book", post(book_unit))
        .route("/me", get(my_live_group))
        .route(
            "/admin/projects",
            get(admin_list_projects).post(create_project),
        )
        .route(
            "/admin/projects/:id",
            put(update_project).delete(delete_project),
        )
        .route("/admin/projects/:id/status", post(change_project_status))
        .route("/admin/projects/:id/hierarchy", put(sync_hierarchy))
        .route("/admin/projects/:id/bookings", get(project_bookings))
        .route("/admin/bookings/:id/cancel", post(cancel_booking))
}
