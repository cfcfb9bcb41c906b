//! Post API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{Post, PostSummary, RenamePostRequest, SavePostRequest, SavedPost, Taxonomy};
use crate::store::paths;
use crate::AppState;

/// GET /api/posts - List all posts (front matter only).
pub async fn list_posts(State(state): State<AppState>) -> ApiResult<Vec<PostSummary>> {
    success(state.posts.list().await?)
}

/// GET /api/posts/taxonomy - Tags and categories in use.
pub async fn get_taxonomy(State(state): State<AppState>) -> ApiResult<Taxonomy> {
    success(state.posts.taxonomy().await?)
}

/// GET /api/posts/*slug - Get one post.
pub async fn get_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Post> {
    success(state.posts.get(&slug).await?)
}

/// POST /api/posts - Create or overwrite a post.
pub async fn save_post(
    State(state): State<AppState>,
    Json(request): Json<SavePostRequest>,
) -> ApiResult<SavedPost> {
    let slug = match request.slug.as_deref().map(str::trim) {
        Some(slug) if !slug.is_empty() => slug.to_string(),
        _ => {
            let title = request.metadata.title.as_deref().unwrap_or_default();
            let derived = paths::slugify_title(title);
            if derived.is_empty() {
                return Err(AppError::Validation(
                    "Post slug or title is required".to_string(),
                ));
            }
            derived
        }
    };

    let slug = state
        .posts
        .save(&slug, &request.metadata, &request.content)
        .await?;
    success(SavedPost { slug })
}

/// POST /api/posts/rename - Move a post to a new slug.
pub async fn rename_post(
    State(state): State<AppState>,
    Json(request): Json<RenamePostRequest>,
) -> ApiResult<SavedPost> {
    let slug = state.posts.rename(&request.from, &request.to).await?;
    success(SavedPost { slug })
}

/// DELETE /api/posts/*slug - Delete a post.
pub async fn delete_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<()> {
    state.posts.delete(&slug).await?;
    success(())
}
