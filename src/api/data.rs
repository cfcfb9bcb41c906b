//! Data collection endpoints (projects, skills, timeline).

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use super::{collection_kind, success, ApiResult};
use crate::models::{CollectionSummary, DeletedRecord, Record, RegenerateOutcome};
use crate::AppState;

/// GET /api/data/:type - List every record.
pub async fn list_records(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> ApiResult<Vec<Record>> {
    let kind = collection_kind(&kind)?;
    success(state.collections.read(kind).await?)
}

/// POST /api/data/:type - Create a record; the body carries its `id`.
pub async fn create_record(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Json(record): Json<Value>,
) -> ApiResult<Record> {
    let kind = collection_kind(&kind)?;
    success(state.collections.create(kind, record).await?)
}

/// PUT /api/data/:type/:id - Merge fields over an existing record.
pub async fn update_record(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
    Json(patch): Json<Value>,
) -> ApiResult<Record> {
    let kind = collection_kind(&kind)?;
    success(state.collections.update(kind, &id, patch).await?)
}

/// DELETE /api/data/:type/:id - Remove a record.
pub async fn delete_record(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
) -> ApiResult<DeletedRecord> {
    let kind = collection_kind(&kind)?;
    success(state.collections.delete(kind, &id).await?)
}

/// POST /api/data/:type/sync - Regenerate the derived source file.
pub async fn sync_collection(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> ApiResult<CollectionSummary> {
    let kind = collection_kind(&kind)?;
    success(state.derived.regenerate(kind).await?)
}

/// POST /api/data/sync - Regenerate every derived source file.
///
/// One failing collection does not stop the others; each outcome is reported.
pub async fn sync_all_collections(
    State(state): State<AppState>,
) -> ApiResult<Vec<RegenerateOutcome>> {
    success(state.derived.regenerate_all().await)
}

/// POST /api/data/:type/restore - Put the backup back in place.
pub async fn restore_collection(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> ApiResult<CollectionSummary> {
    let kind = collection_kind(&kind)?;
    let item_count = state.collections.restore(kind).await?;
    success(CollectionSummary {
        kind: kind.as_str(),
        item_count,
    })
}

/// POST /api/data/:type/import - Seed the JSON collection from the derived source.
pub async fn import_collection(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> ApiResult<CollectionSummary> {
    let kind = collection_kind(&kind)?;
    success(state.derived.import(kind).await?)
}
