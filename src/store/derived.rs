//! Derived TypeScript data files.
//!
//! `src/data/<type>.ts` re-exports a collection as a typed array literal.
//! The JSON collection is the source of truth; the hand-written interface
//! declaration and the trailing helper functions are scraped from the
//! previous version of the file and carried over unchanged.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::OnceLock;

use chrono::{SecondsFormat, Utc};
use regex::Regex;
use serde_json::Value;

use super::CollectionStore;
use crate::errors::AppError;
use crate::models::{CollectionKind, CollectionSummary, Record, RegenerateOutcome};

const HEADER_GENERATED: &str = "// Auto-generated from JSON - Edit via admin dashboard";
const HEADER_TIMESTAMP: &str = "// Last updated: ";

/// The hand-written parts of a derived file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub interface: String,
    pub helpers: String,
}

impl Template {
    /// Extract the first interface block and the `// Get ...` helper block.
    pub fn extract(source: &str) -> Result<Self, AppError> {
        static INTERFACE: OnceLock<Regex> = OnceLock::new();
        static HELPERS: OnceLock<Regex> = OnceLock::new();

        let interface_re =
            INTERFACE.get_or_init(|| Regex::new(r"(?ms)export interface.*?^\}").unwrap());
        let helpers_re = HELPERS.get_or_init(|| Regex::new(r"(?ms)^// Get.*\z").unwrap());

        let interface = interface_re
            .find(source)
            .ok_or_else(|| AppError::Template("No interface declaration found".to_string()))?
            .as_str()
            .to_string();
        let helpers = helpers_re
            .find(source)
            .ok_or_else(|| AppError::Template("No helper block (// Get ...) found".to_string()))?
            .as_str()
            .trim_end()
            .to_string();

        Ok(Self { interface, helpers })
    }
}

/// Regenerates and reads the derived source file of each collection.
#[derive(Debug, Clone)]
pub struct DerivedSources {
    data_dir: PathBuf,
    collections: CollectionStore,
}

impl DerivedSources {
    pub fn new(data_dir: impl Into<PathBuf>, collections: CollectionStore) -> Self {
        Self {
            data_dir: data_dir.into(),
            collections,
        }
    }

    pub fn source_path(&self, kind: CollectionKind) -> PathBuf {
        self.data_dir.join(format!("{}.ts", kind.as_str()))
    }

    /// Rewrite the derived file from the current JSON collection.
    ///
    /// Fails without touching the file if the previous version has no
    /// recognizable interface or helper block. The file is left as-is when
    /// only its timestamp would change.
    pub async fn regenerate(&self, kind: CollectionKind) -> Result<CollectionSummary, AppError> {
        let records = self.collections.read(kind).await?;
        let path = self.source_path(kind);
        let existing = self.read_source(kind).await?;

        let template = Template::extract(&existing)
            .map_err(|e| AppError::Template(format!("{}: {}", path.display(), e.message())))?;

        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let rendered = render(kind, &template, &records, &timestamp)?;

        if strip_timestamp(&rendered) == strip_timestamp(&existing) {
            tracing::debug!(collection = %kind, "Derived source already up to date");
        } else {
            tokio::fs::write(&path, rendered).await?;
            tracing::info!(collection = %kind, items = records.len(), "Regenerated derived source");
        }

        Ok(CollectionSummary {
            kind: kind.as_str(),
            item_count: records.len(),
        })
    }

    /// Regenerate every collection, reporting each outcome separately.
    pub async fn regenerate_all(&self) -> Vec<RegenerateOutcome> {
        let mut outcomes = Vec::with_capacity(CollectionKind::ALL.len());
        for kind in CollectionKind::ALL {
            let outcome = match self.regenerate(kind).await {
                Ok(summary) => RegenerateOutcome {
                    kind: summary.kind,
                    item_count: Some(summary.item_count),
                    error: None,
                },
                Err(e) => {
                    tracing::error!(collection = %kind, "Failed to regenerate: {}", e);
                    RegenerateOutcome {
                        kind: kind.as_str(),
                        item_count: None,
                        error: Some(e.message()),
                    }
                }
            };
            outcomes.push(outcome);
        }
        outcomes
    }

    /// Read the data array out of the derived file and store it as the
    /// JSON collection.
    pub async fn import(&self, kind: CollectionKind) -> Result<CollectionSummary, AppError> {
        let source = self.read_source(kind).await?;
        let records = extract_records(kind, &source)?;
        self.collections.replace(kind, &records).await?;

        Ok(CollectionSummary {
            kind: kind.as_str(),
            item_count: records.len(),
        })
    }

    async fn read_source(&self, kind: CollectionKind) -> Result<String, AppError> {
        let path = self.source_path(kind);
        tokio::fs::read_to_string(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                AppError::Template(format!("Derived source {} does not exist", path.display()))
            } else {
                e.into()
            }
        })
    }
}

fn render(
    kind: CollectionKind,
    template: &Template,
    records: &[Record],
    timestamp: &str,
) -> Result<String, AppError> {
    let interface_name = kind.interface_name();
    let data = serde_json::to_string_pretty(records)?;

    Ok(format!(
        "// {interface_name} data configuration file\n\
         {HEADER_GENERATED}\n\
         {HEADER_TIMESTAMP}{timestamp}\n\
         \n\
         {interface}\n\
         \n\
         export const {var}: {interface_name}[] = {data};\n\
         \n\
         {helpers}\n",
        interface = template.interface,
        var = kind.data_var_name(),
        helpers = template.helpers,
    ))
}

/// Drop the `Last updated` line so two renders can be compared.
fn strip_timestamp(source: &str) -> String {
    source
        .lines()
        .filter(|line| !line.starts_with(HEADER_TIMESTAMP))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse the `export const <type>Data: T[] = [...];` literal as JSON.
fn extract_records(kind: CollectionKind, source: &str) -> Result<Vec<Record>, AppError> {
    let pattern = format!(
        r"(?ms)export const {}\b[^=]*=\s*(\[\s*\]|\[.*?^\]);",
        regex::escape(&kind.data_var_name())
    );
    let re = Regex::new(&pattern)
        .map_err(|e| AppError::Internal(format!("Invalid data array pattern: {}", e)))?;

    let literal = re
        .captures(source)
        .and_then(|c| c.get(1))
        .ok_or_else(|| {
            AppError::Template(format!(
                "No {} array found in derived source",
                kind.data_var_name()
            ))
        })?
        .as_str();

    let values: Vec<Value> = serde_json::from_str(literal).map_err(|e| {
        AppError::Template(format!(
            "{} array is not plain JSON and cannot be imported: {}",
            kind.data_var_name(),
            e
        ))
    })?;

    values
        .into_iter()
        .map(|value| match value {
            Value::Object(record) => Ok(record),
            _ => Err(AppError::Template(format!(
                "{} array contains a non-object entry",
                kind.data_var_name()
            ))),
        })
        .collect()
}
