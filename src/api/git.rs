//! Git sync endpoints.

use axum::{extract::State, Json};

use super::{success, ApiResult};
use crate::models::{GitStatus, SyncOutcome, SyncRequest};
use crate::AppState;

/// GET /api/git/status - Branch and uncommitted changes.
pub async fn git_status(State(state): State<AppState>) -> ApiResult<GitStatus> {
    success(state.git.status().await?)
}

/// POST /api/git/sync - Stage, commit and push everything.
///
/// The body is optional; an empty or missing message gets a timestamped default.
pub async fn git_sync(
    State(state): State<AppState>,
    request: Option<Json<SyncRequest>>,
) -> ApiResult<SyncOutcome> {
    let Json(request) = request.unwrap_or_default();
    success(state.git.sync(request.message.as_deref()).await?)
}

/// POST /api/git/push-posts - One-click publish with the fixed message.
pub async fn git_publish(State(state): State<AppState>) -> ApiResult<SyncOutcome> {
    success(state.git.publish().await?)
}
