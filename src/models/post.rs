//! Post models matching the front matter the site generator reads.

use serde::{Deserialize, Serialize};

/// Front matter of a markdown post.
///
/// Known keys are typed; anything else the site uses is kept in `extra`
/// so it survives a read/write cycle in its original order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Listing entry: the slug plus the post's front matter, flattened.
#[derive(Debug, Clone, Serialize)]
pub struct PostSummary {
    pub slug: String,
    #[serde(flatten)]
    pub metadata: PostMetadata,
}

/// A fully parsed post.
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    pub metadata: PostMetadata,
    pub content: String,
}

/// Request body for creating or overwriting a post.
#[derive(Debug, Clone, Deserialize)]
pub struct SavePostRequest {
    /// Relative path under the posts root, without extension. Derived from
    /// the title when omitted.
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub metadata: PostMetadata,
    #[serde(default)]
    pub content: String,
}

/// Request body for moving a post to a new slug.
#[derive(Debug, Clone, Deserialize)]
pub struct RenamePostRequest {
    pub from: String,
    pub to: String,
}

/// Result of a save or rename, echoing the slug that was written.
#[derive(Debug, Clone, Serialize)]
pub struct SavedPost {
    pub slug: String,
}

/// Tags and categories in use across all posts.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Taxonomy {
    pub tags: Vec<String>,
    pub categories: Vec<String>,
}
