//! Media store for the flat assets directory.

use std::io::ErrorKind;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

use super::paths;
use crate::errors::AppError;
use crate::models::{MediaAsset, UploadedMedia};

/// Extensions listed as media.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "svg"];

/// Filesystem-backed media repository.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
    public_prefix: String,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_prefix: public_prefix.into(),
        }
    }

    fn public_path(&self, name: &str) -> String {
        format!("{}/{}", self.public_prefix.trim_end_matches('/'), name)
    }

    /// List images, newest first.
    pub async fn list(&self) -> Result<Vec<MediaAsset>, AppError> {
        tokio::fs::create_dir_all(&self.root).await?;

        let mut assets = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !is_image(&name) {
                continue;
            }

            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            let mtime: DateTime<Utc> = metadata.modified()?.into();

            assets.push(MediaAsset {
                path: self.public_path(&name),
                name,
                size: metadata.len(),
                mtime,
            });
        }

        assets.sort_by(|a, b| b.mtime.cmp(&a.mtime).then_with(|| a.name.cmp(&b.name)));
        Ok(assets)
    }

    /// Write an upload under its original name, replacing any existing file.
    pub async fn upload(&self, name: &str, bytes: &[u8]) -> Result<UploadedMedia, AppError> {
        let path = paths::file_path(&self.root, name)?;
        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(&path, bytes).await?;

        tracing::info!(file = %name, size = bytes.len(), "Uploaded media");
        Ok(UploadedMedia {
            name: name.to_string(),
            path: self.public_path(name),
        })
    }

    /// Remove a file.
    pub async fn delete(&self, name: &str) -> Result<(), AppError> {
        let path = paths::file_path(&self.root, name)?;
        tokio::fs::remove_file(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                AppError::NotFound(format!("Media {} not found", name))
            } else {
                e.into()
            }
        })?;

        tracing::info!(file = %name, "Deleted media");
        Ok(())
    }
}

fn is_image(name: &str) -> bool {
    name.rsplit_once('.')
        .map(|(_, ext)| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    #[test]
    fn test_is_image() {
        assert!(is_image("a.PNG"));
        assert!(is_image("photo.jpeg"));
        assert!(is_image("icon.svg"));
        assert!(!is_image("notes.txt"));
        assert!(!is_image("png"));
    }

    #[tokio::test]
    async fn test_upload_list_delete() {
        let temp_dir = TempDir::new().unwrap();
        let store = MediaStore::new(temp_dir.path().join("assets"), "/assets");

        let uploaded = store.upload("cover.png", b"png-bytes").await.unwrap();
        assert_eq!(uploaded.path, "/assets/cover.png");
        store.upload("readme.txt", b"text").await.unwrap();

        let assets = store.list().await.unwrap();
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].name, "cover.png");
        assert_eq!(assets[0].size, 9);

        store.delete("cover.png").await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
        assert!(matches!(
            store.delete("cover.png").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_upload_overwrites_same_name() {
        let temp_dir = TempDir::new().unwrap();
        let store = MediaStore::new(temp_dir.path(), "/assets");

        store.upload("a.png", b"first").await.unwrap();
        store.upload("a.png", b"second!").await.unwrap();

        let assets = store.list().await.unwrap();
        assert_eq!(assets.len(), 1);
        assert_eq!(assets[0].size, 7);
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let temp_dir = TempDir::new().unwrap();
        let store = MediaStore::new(temp_dir.path(), "/assets");

        store.upload("old.png", b"o").await.unwrap();
        store.upload("new.png", b"n").await.unwrap();

        let past = SystemTime::now() - Duration::from_secs(3600);
        let file = std::fs::File::options()
            .write(true)
            .open(temp_dir.path().join("old.png"))
            .unwrap();
        file.set_modified(past).unwrap();

        let names: Vec<String> = store.list().await.unwrap().into_iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["new.png", "old.png"]);
    }

    #[tokio::test]
    async fn test_traversal_filename_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let store = MediaStore::new(temp_dir.path().join("assets"), "/assets");

        assert!(matches!(
            store.upload("../evil.png", b"x").await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            store.delete("../../etc/passwd").await,
            Err(AppError::Validation(_))
        ));
    }
}
