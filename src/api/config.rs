//! Site configuration endpoints.

use axum::{extract::State, Json};
use serde_json::Value;

use super::{success, ApiResult};
use crate::AppState;

/// GET /api/config - Read the whole site configuration.
pub async fn get_config(State(state): State<AppState>) -> ApiResult<Value> {
    success(state.site_config.read().await?)
}

/// POST /api/config - Replace the whole site configuration.
pub async fn save_config(
    State(state): State<AppState>,
    Json(config): Json<Value>,
) -> ApiResult<()> {
    state.site_config.write(&config).await?;
    success(())
}
