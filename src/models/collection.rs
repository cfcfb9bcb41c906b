//! Data collection models (projects, skills, timeline).

use serde::Serialize;

/// A single record of a collection. Records are schemaless JSON objects
/// carrying a mandatory string `id`; field order is preserved on disk.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// The three JSON-backed collections the dashboard edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    Projects,
    Skills,
    Timeline,
}

impl CollectionKind {
    pub const ALL: [CollectionKind; 3] = [
        CollectionKind::Projects,
        CollectionKind::Skills,
        CollectionKind::Timeline,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionKind::Projects => "projects",
            CollectionKind::Skills => "skills",
            CollectionKind::Timeline => "timeline",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "projects" => Some(CollectionKind::Projects),
            "skills" => Some(CollectionKind::Skills),
            "timeline" => Some(CollectionKind::Timeline),
            _ => None,
        }
    }

    /// Element type of the generated array literal.
    pub fn interface_name(&self) -> &'static str {
        match self {
            CollectionKind::Projects => "Project",
            CollectionKind::Skills => "Skill",
            CollectionKind::Timeline => "TimelineItem",
        }
    }

    /// Name of the exported array in the derived source file.
    pub fn data_var_name(&self) -> String {
        format!("{}Data", self.as_str())
    }
}

impl std::fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary returned by operations that rewrite a whole collection or its
/// derived source file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSummary {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub item_count: usize,
}

/// Per-collection outcome of regenerating every derived source file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegenerateOutcome {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Confirmation of a deleted record.
#[derive(Debug, Clone, Serialize)]
pub struct DeletedRecord {
    pub id: String,
    pub deleted: bool,
}
