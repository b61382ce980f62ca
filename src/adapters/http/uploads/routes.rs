use axum::{extract::DefaultBodyLimit, routing::post, Router};

use crate::application::handlers::uploads::MAX_FILES_PER_REQUEST;

use super::super::state::AppState;
use super::handlers::{delete_image, upload_images};

/// Multipart framing on top of the file bytes.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Routes mounted at `/api/uploads`.
///
/// The body limit admits a full batch of maximum-size files; per-file size is
/// enforced by the upload handler.
pub fn upload_routes(max_upload_bytes: usize) -> Router<AppState> {
    let body_limit = max_upload_bytes * MAX_FILES_PER_REQUEST + MULTIPART_OVERHEAD;
    Router::new()
        .route("/images", post(upload_images).delete(delete_image))
        .layer(DefaultBodyLimit::max(body_limit))
}
