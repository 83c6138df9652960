use serde::{Deserialize, Serialize};

/// Thumbnail image attached to an article summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

/// Canonical summary of a Wikipedia article.
///
/// An empty `summary` is how a failed fetch shows up; see
/// [`SummaryFetcher`](crate::wiki::SummaryFetcher).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSummary {
    pub title: String,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<Thumbnail>,
}

impl ArticleSummary {
    /// Placeholder returned when a summary could not be fetched.
    pub fn placeholder(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            summary: String::new(),
            thumbnail: None,
        }
    }

    /// Returns a copy with `summary` replaced and every other field kept.
    pub fn with_summary(&self, summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            ..self.clone()
        }
    }
}

/// One entry in the rabbit hole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub article: ArticleSummary,
    pub note: String,
}

/// Everything the session holds: a free-text title and the ordered nodes.
///
/// Display order is insertion order. Nodes are addressed by index only, so an
/// index held across a removal may point at a different node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub title: String,
    pub nodes: Vec<Node>,
}

impl SessionState {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
