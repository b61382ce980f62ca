use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use super::super::state::AppState;
use super::handlers::{
    change_user_role, dashboard_stats, delete_user, list_properties, list_users,
    moderate_property,
};

/// Routes mounted at `/api/admin`.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(dashboard_stats))
        .route("/users", get(list_users))
        .route("/users/:id/role", patch(change_user_role))
        .route("/users/:id", delete(delete_user))
        .route("/properties", get(list_properties))
        .route("/properties/:id/moderate", post(moderate_property))
}
