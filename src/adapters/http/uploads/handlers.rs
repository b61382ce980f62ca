//! HTTP handlers for `/api/uploads`.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::application::handlers::uploads::{
    DeleteImageCommand, ImageFile, UploadFolder, UploadImagesCommand, MAX_FILES_PER_REQUEST,
};

use super::super::error::{ApiError, ApiJson};
use super::super::middleware::{RequireAdmin, RequireAuth};
use super::super::state::AppState;
use super::dto::{DeleteImageRequest, UploadResponse};

/// POST /api/uploads/images - multipart `file` parts plus an optional `folder`
pub async fn upload_images(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut folder = UploadFolder::default();
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request("file", e.body_text()))?
    {
        match field.name() {
            Some("file") | Some("files") | Some("images") => {
                if files.len() == MAX_FILES_PER_REQUEST {
                    return Err(ApiError::bad_request(
                        "file",
                        format!("At most {} images per request", MAX_FILES_PER_REQUEST),
                    ));
                }
                let file_name = field.file_name().unwrap_or("upload").to_owned();
                let content_type = field.content_type().unwrap_or_default().to_owned();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request("file", e.body_text()))?;
                files.push(ImageFile {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            Some("folder") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request("folder", e.body_text()))?;
                folder = text.parse()?;
            }
            _ => {}
        }
    }

    let stored = state
        .upload_images_handler()
        .handle(UploadImagesCommand {
            user_id: user.id,
            folder,
            files,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(UploadResponse { files: stored })))
}

/// DELETE /api/uploads/images - admin only
pub async fn delete_image(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiJson(req): ApiJson<DeleteImageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .delete_image_handler()
        .handle(DeleteImageCommand {
            actor: admin,
            public_id: req.public_id,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
