//! Site configuration document, read and written wholesale.

use std::io::ErrorKind;
use std::path::PathBuf;

use serde_json::Value;

use crate::errors::AppError;

#[derive(Debug, Clone)]
pub struct SiteConfigStore {
    path: PathBuf,
}

impl SiteConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub async fn read(&self) -> Result<Value, AppError> {
        let text = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                AppError::NotFound(format!("Site config {} not found", self.path.display()))
            } else {
                e.into()
            }
        })?;
        serde_json::from_str(&text).map_err(|e| {
            AppError::Internal(format!("Site config is not valid JSON: {}", e))
        })
    }

    pub async fn write(&self, config: &Value) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let text = serde_json::to_string_pretty(config)?;
        tokio::fs::write(&self.path, text).await?;

        tracing::info!(path = %self.path.display(), "Saved site config");
        Ok(())
    }
}
