//! Media asset models.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// An image in the assets directory.
#[derive(Debug, Clone, Serialize)]
pub struct MediaAsset {
    pub name: String,
    /// Public path the site serves the file under
    pub path: String,
    pub size: u64,
    pub mtime: DateTime<Utc>,
}

/// Reference to a freshly uploaded file.
#[derive(Debug, Clone, Serialize)]
pub struct UploadedMedia {
    pub name: String,
    pub path: String,
}
