//! Detail overlay: shows an article's full text and captures a manual selection
//! as a summary override.

use crate::compose::Composer;
use crate::store::NodeStore;
use crate::wiki::WikiClient;

pub const NO_CONTENT: &str = "No content available";
pub const LOAD_ERROR: &str = "Error loading article content";

/// Where a confirmed selection goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideTarget {
    /// The article currently selected in the composition form.
    Pending,
    /// An existing node, by position.
    Node(usize),
}

#[derive(Debug, Clone)]
pub struct DetailOverlay {
    title: String,
    target: OverrideTarget,
    content: Option<String>,
    selection: String,
}

/// A confirmed selection, ready to be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub target: OverrideTarget,
    pub text: String,
}

impl DetailOverlay {
    pub fn open(title: impl Into<String>, target: OverrideTarget) -> Self {
        Self {
            title: title.into(),
            target,
            content: None,
            selection: String::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn target(&self) -> OverrideTarget {
        self.target
    }

    /// `None` until [`load`](Self::load) has finished.
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.content.is_none()
    }

    /// Fetch the full text. Failures become a readable message in the content.
    pub async fn load(&mut self, client: &WikiClient) {
        let content = match client.full_text(&self.title).await {
            Ok(Some(text)) if !text.is_empty() => text,
            Ok(_) => NO_CONTENT.to_string(),
            Err(e) => {
                tracing::warn!("Error fetching article content for {:?}: {}", self.title, e);
                LOAD_ERROR.to_string()
            }
        };
        self.content = Some(content);
    }

    /// Record the user's current selection. Whitespace-only clears it.
    pub fn select(&mut self, text: &str) {
        self.selection = text.trim().to_string();
    }

    pub fn selection(&self) -> &str {
        &self.selection
    }

    pub fn can_confirm(&self) -> bool {
        !self.selection.is_empty()
    }

    /// Close the overlay, yielding the selection if there is one.
    pub fn confirm(self) -> Option<Confirmation> {
        if !self.can_confirm() {
            return None;
        }
        Some(Confirmation {
            target: self.target,
            text: self.selection,
        })
    }
}

impl Confirmation {
    /// Route the selection to the form override or to the node's summary.
    ///
    /// Returns `false` when the target node index is out of range or the form
    /// is busy submitting.
    pub fn apply(self, store: &NodeStore, form: &mut Composer) -> bool {
        match self.target {
            OverrideTarget::Pending => form.apply_override(self.text).is_ok(),
            OverrideTarget::Node(index) => store.update_node_summary(index, self.text),
        }
    }
}
