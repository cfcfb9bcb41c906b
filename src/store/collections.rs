//! JSON-backed record collections.
//!
//! Each collection is one `<type>.json` array. Every operation loads the
//! whole file; every mutation first copies the current file to
//! `<type>.backup.json` (single generation) and then rewrites the primary.

use std::io::ErrorKind;
use std::path::PathBuf;

use serde_json::Value;

use crate::errors::AppError;
use crate::models::{CollectionKind, DeletedRecord, Record};

/// Repository for the projects, skills and timeline collections.
#[derive(Debug, Clone)]
pub struct CollectionStore {
    json_dir: PathBuf,
}

impl CollectionStore {
    pub fn new(json_dir: impl Into<PathBuf>) -> Self {
        Self {
            json_dir: json_dir.into(),
        }
    }

    pub fn primary_path(&self, kind: CollectionKind) -> PathBuf {
        self.json_dir.join(format!("{}.json", kind.as_str()))
    }

    pub fn backup_path(&self, kind: CollectionKind) -> PathBuf {
        self.json_dir.join(format!("{}.backup.json", kind.as_str()))
    }

    /// Load a whole collection. A missing file is `NotFound`; it is never
    /// created implicitly.
    pub async fn read(&self, kind: CollectionKind) -> Result<Vec<Record>, AppError> {
        let path = self.primary_path(kind);
        let text = tokio::fs::read_to_string(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                AppError::NotFound(format!("Collection {} not found", kind))
            } else {
                e.into()
            }
        })?;

        let values: Vec<Value> = serde_json::from_str(&text).map_err(|e| {
            AppError::Internal(format!("Collection {} is not a JSON array: {}", kind, e))
        })?;

        values
            .into_iter()
            .map(|value| match value {
                Value::Object(record) => Ok(record),
                other => Err(AppError::Internal(format!(
                    "Collection {} contains a non-object entry: {}",
                    kind, other
                ))),
            })
            .collect()
    }

    /// Append a record. Its `id` must be present and unused.
    pub async fn create(&self, kind: CollectionKind, record: Value) -> Result<Record, AppError> {
        let record = into_record(record)?;
        let id = record_id(&record)
            .ok_or_else(|| AppError::Validation("Record id is required".to_string()))?
            .to_string();

        let mut records = self.read(kind).await?;
        if records.iter().any(|r| record_id(r) == Some(id.as_str())) {
            return Err(AppError::Conflict(format!(
                "Item with ID \"{}\" already exists",
                id
            )));
        }

        records.push(record.clone());
        self.persist(kind, &records).await?;

        tracing::info!(collection = %kind, id = %id, "Created record");
        Ok(record)
    }

    /// Shallow-merge `patch` over an existing record. The id never changes.
    pub async fn update(
        &self,
        kind: CollectionKind,
        id: &str,
        patch: Value,
    ) -> Result<Record, AppError> {
        let patch = into_record(patch)?;
        let mut records = self.read(kind).await?;

        let existing = records
            .iter_mut()
            .find(|r| record_id(r) == Some(id))
            .ok_or_else(|| AppError::NotFound(format!("Item with ID \"{}\" not found", id)))?;

        for (key, value) in patch {
            existing.insert(key, value);
        }
        existing.insert("id".to_string(), Value::String(id.to_string()));
        let updated = existing.clone();

        self.persist(kind, &records).await?;

        tracing::info!(collection = %kind, id = %id, "Updated record");
        Ok(updated)
    }

    /// Remove a record.
    pub async fn delete(&self, kind: CollectionKind, id: &str) -> Result<DeletedRecord, AppError> {
        let records = self.read(kind).await?;
        let before = records.len();
        let remaining: Vec<Record> = records
            .into_iter()
            .filter(|r| record_id(r) != Some(id))
            .collect();

        if remaining.len() == before {
            return Err(AppError::NotFound(format!("Item with ID \"{}\" not found", id)));
        }

        self.persist(kind, &remaining).await?;

        tracing::info!(collection = %kind, id = %id, "Deleted record");
        Ok(DeletedRecord {
            id: id.to_string(),
            deleted: true,
        })
    }

    /// Replace the whole collection (used when importing from a derived file).
    pub async fn replace(&self, kind: CollectionKind, records: &[Record]) -> Result<(), AppError> {
        check_unique_ids(kind, records)?;
        tokio::fs::create_dir_all(&self.json_dir).await?;
        self.persist(kind, records).await?;

        tracing::info!(collection = %kind, count = records.len(), "Replaced collection");
        Ok(())
    }

    /// Copy the backup back over the primary file.
    pub async fn restore(&self, kind: CollectionKind) -> Result<usize, AppError> {
        let backup = tokio::fs::read_to_string(self.backup_path(kind))
            .await
            .map_err(|e| {
                if e.kind() == ErrorKind::NotFound {
                    AppError::NotFound(format!("No backup for collection {}", kind))
                } else {
                    e.into()
                }
            })?;

        tokio::fs::write(self.primary_path(kind), backup).await?;
        let count = self.read(kind).await?.len();

        tracing::info!(collection = %kind, count, "Restored collection from backup");
        Ok(count)
    }

    /// Back up the current file (best effort), then write `records`.
    async fn persist(&self, kind: CollectionKind, records: &[Record]) -> Result<(), AppError> {
        let primary = self.primary_path(kind);

        match tokio::fs::read(&primary).await {
            Ok(current) => {
                if let Err(e) = tokio::fs::write(self.backup_path(kind), current).await {
                    tracing::warn!(collection = %kind, "Could not create backup: {}", e);
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(collection = %kind, "Could not create backup: {}", e);
            }
        }

        let text = serde_json::to_string_pretty(records)?;
        tokio::fs::write(&primary, text).await?;
        Ok(())
    }
}

fn into_record(value: Value) -> Result<Record, AppError> {
    match value {
        Value::Object(record) => Ok(record),
        _ => Err(AppError::Validation("Record must be a JSON object".to_string())),
    }
}

fn record_id(record: &Record) -> Option<&str> {
    record
        .get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.trim().is_empty())
}

fn check_unique_ids(kind: CollectionKind, records: &[Record]) -> Result<(), AppError> {
    let mut seen = std::collections::HashSet::new();
    for record in records {
        let id = record_id(record).ok_or_else(|| {
            AppError::Validation(format!("Collection {} has a record without an id", kind))
        })?;
        if !seen.insert(id) {
            return Err(AppError::Conflict(format!(
                "Collection {} has duplicate id \"{}\"",
                kind, id
            )));
        }
    }
    Ok(())
}
