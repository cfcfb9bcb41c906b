//! Media API endpoints.

use axum::extract::{Multipart, Path, State};

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{MediaAsset, UploadedMedia};
use crate::AppState;

/// GET /api/media - List images, newest first.
pub async fn list_media(State(state): State<AppState>) -> ApiResult<Vec<MediaAsset>> {
    success(state.media.list().await?)
}

/// POST /api/media - Upload the multipart field `file` under its own name.
pub async fn upload_media(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<UploadedMedia> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("Uploaded file has no name".to_string()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read file: {}", e)))?;

        return success(state.media.upload(&name, &bytes).await?);
    }

    Err(AppError::Validation("No file uploaded".to_string()))
}

/// DELETE /api/media/:filename - Delete one file.
pub async fn delete_media(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<()> {
    state.media.delete(&filename).await?;
    success(())
}
