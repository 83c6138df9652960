use serde::{Deserialize, Serialize};

/// A prefix-search candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    /// Short description, empty when Wikipedia has none.
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    /// Server-provided rank. Lower ranks sort first.
    pub index: i64,
}
