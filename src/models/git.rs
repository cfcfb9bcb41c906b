//! Git sync models.

use serde::{Deserialize, Serialize};

/// Working tree state, computed on demand.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GitStatus {
    pub has_changes: bool,
    pub branch: String,
    /// Raw `git status --porcelain` lines
    pub changes: Vec<String>,
}

/// Request body for a sync.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SyncRequest {
    #[serde(default)]
    pub message: Option<String>,
}

/// What a sync actually did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncOutcome {
    pub message: String,
    pub committed: bool,
    pub pushed: bool,
}
