//! Markdown post store.
//!
//! Posts live under one root, possibly in nested directories. A post's slug
//! is its path relative to the root, without the `.md` extension, with `/`
//! separators. Every call goes back to disk.

use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::{frontmatter, paths};
use crate::errors::AppError;
use crate::models::{Post, PostMetadata, PostSummary, Taxonomy};

const EXTENSION: &str = "md";

/// Filesystem-backed post repository.
#[derive(Debug, Clone)]
pub struct PostStore {
    root: PathBuf,
}

impl PostStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// List every post with its front matter (bodies are not returned).
    pub async fn list(&self) -> Result<Vec<PostSummary>, AppError> {
        tokio::fs::create_dir_all(&self.root).await?;

        let files = self.markdown_files().await?;
        let mut posts = Vec::with_capacity(files.len());

        for (slug, path) in files {
            let text = match tokio::fs::read_to_string(&path).await {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(slug = %slug, "Skipping unreadable post: {}", e);
                    continue;
                }
            };
            match frontmatter::parse_metadata::<PostMetadata>(&text) {
                Ok(metadata) => posts.push(PostSummary { slug, metadata }),
                Err(e) => {
                    tracing::warn!(slug = %slug, "Skipping post with unreadable front matter: {}", e);
                }
            }
        }

        Ok(posts)
    }

    /// Read and fully parse one post.
    pub async fn get(&self, slug: &str) -> Result<Post, AppError> {
        let path = paths::slug_path(&self.root, slug, EXTENSION)?;
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| not_found_or_io(e, slug))?;
        let (metadata, content) = frontmatter::parse(&text)?;
        Ok(Post { metadata, content })
    }

    /// Create or overwrite a post.
    pub async fn save(
        &self,
        slug: &str,
        metadata: &PostMetadata,
        content: &str,
    ) -> Result<String, AppError> {
        let slug = paths::validate_slug(slug)?;
        let path = paths::slug_path(&self.root, &slug, EXTENSION)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let text = frontmatter::serialize(content, metadata)?;
        tokio::fs::write(&path, text).await?;

        tracing::info!(slug = %slug, "Saved post");
        Ok(slug)
    }

    /// Remove a post.
    pub async fn delete(&self, slug: &str) -> Result<(), AppError> {
        let path = paths::slug_path(&self.root, slug, EXTENSION)?;
        tokio::fs::remove_file(&path)
            .await
            .map_err(|e| not_found_or_io(e, slug))?;

        tracing::info!(slug = %slug, "Deleted post");
        Ok(())
    }

    /// Move a post to a new slug. Refuses to overwrite an existing post.
    pub async fn rename(&self, from: &str, to: &str) -> Result<String, AppError> {
        let source = paths::slug_path(&self.root, from, EXTENSION)?;
        let to = paths::validate_slug(to)?;
        let target = paths::slug_path(&self.root, &to, EXTENSION)?;

        if !tokio::fs::try_exists(&source).await? {
            return Err(AppError::NotFound(format!("Post {} not found", from)));
        }
        if tokio::fs::try_exists(&target).await? {
            return Err(AppError::Conflict(format!("Post {} already exists", to)));
        }

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::rename(&source, &target).await?;

        tracing::info!(from = %from, to = %to, "Renamed post");
        Ok(to)
    }

    /// Collect the tags and categories used across all posts.
    pub async fn taxonomy(&self) -> Result<Taxonomy, AppError> {
        let mut tags = BTreeSet::new();
        let mut categories = BTreeSet::new();

        for post in self.list().await? {
            for tag in post.metadata.tags.unwrap_or_default() {
                let tag = tag.trim();
                if !tag.is_empty() {
                    tags.insert(tag.to_string());
                }
            }
            if let Some(category) = post.metadata.category {
                let category = category.trim();
                if !category.is_empty() {
                    categories.insert(category.to_string());
                }
            }
        }

        Ok(Taxonomy {
            tags: tags.into_iter().collect(),
            categories: categories.into_iter().collect(),
        })
    }

    /// Walk the root for markdown files, returning `(slug, path)` sorted by slug.
    async fn markdown_files(&self) -> Result<Vec<(String, PathBuf)>, AppError> {
        let root = self.root.clone();

        tokio::task::spawn_blocking(move || {
            let mut files = Vec::new();
            let walker = WalkDir::new(&root)
                .follow_links(false)
                .into_iter()
                .filter_entry(|e| e.depth() == 0 || !is_hidden(e));
            for entry in walker {
                let entry = entry.map_err(|e| AppError::Io(format!("Failed to walk posts: {}", e)))?;
                if !entry.file_type().is_file() {
                    continue;
                }
                let path = entry.path();
                if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                    continue;
                }
                let Some(slug) = slug_for(&root, path) else {
                    continue;
                };
                if let Err(e) = paths::validate_slug(&slug) {
                    tracing::warn!(path = %path.display(), "Skipping post with unaddressable slug: {}", e);
                    continue;
                }
                files.push((slug, path.to_path_buf()));
            }
            files.sort_by(|a, b| a.0.cmp(&b.0));
            Ok::<_, AppError>(files)
        })
        .await
        .map_err(|e| AppError::Internal(format!("Post listing task failed: {}", e)))?
    }
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

/// Relative path without extension, joined with `/`.
fn slug_for(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?.with_extension("");
    let segments: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if segments.is_empty() {
        return None;
    }
    Some(segments.join("/"))
}

fn not_found_or_io(err: std::io::Error, slug: &str) -> AppError {
    if err.kind() == ErrorKind::NotFound {
        AppError::NotFound(format!("Post {} not found", slug))
    } else {
        err.into()
    }
}
