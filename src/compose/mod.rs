//! Composition form: picks an article, collects a note and submits the pair to
//! the [`NodeStore`].
//!
//! # States
//!
//! ```text
//! Empty --select--> ArticleSelected --note--> Submittable --submit--> Submitting
//!   ^                     |                                                |
//!   +------clear----------+------------------------------------------------+
//! ```
//!
//! Submission re-fetches the canonical summary. A summary override captured from
//! the detail overlay wins over the fetched extract. The node is only appended
//! once the fetch resolves. Edits are refused while a submission is in flight.
//!
//! Article search for the form lives in [`SearchPanel`].

mod mention;
mod search;

pub use mention::*;
pub use search::*;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::models::{ArticleSummary, Node};
use crate::store::NodeStore;
use crate::wiki::SummaryFetcher;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormState {
    Empty,
    ArticleSelected,
    Submittable,
    Submitting,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComposeError {
    #[error("Select an article and write a note before submitting")]
    NotSubmittable,

    #[error("A submission is already in progress")]
    AlreadySubmitting,

    #[error("Submission was interrupted: {0}")]
    Interrupted(String),
}

/// A form shared between request handlers.
pub type SharedComposer = Arc<Mutex<Composer>>;

/// Values captured when a submission starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitTicket {
    pub title: String,
    pub note: String,
    pub summary_override: Option<String>,
}

impl SubmitTicket {
    /// Merge the freshly fetched summary with the captured override.
    pub fn into_node(self, fetched: ArticleSummary) -> Node {
        let article = match self.summary_override.filter(|s| !s.is_empty()) {
            Some(text) => fetched.with_summary(text),
            None => fetched,
        };
        Node {
            article,
            note: self.note,
        }
    }
}

/// Read-only view of the form, as served over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormView {
    pub state: FormState,
    pub note: String,
    pub selected_article: Option<String>,
    pub summary_override: Option<String>,
    pub can_submit: bool,
}

#[derive(Debug, Clone)]
pub struct Composer {
    store: NodeStore,
    fetcher: SummaryFetcher,
    note: String,
    selected_article: Option<String>,
    summary_override: Option<String>,
    submitting: bool,
}

impl Composer {
    pub fn new(store: NodeStore, fetcher: SummaryFetcher) -> Self {
        Self {
            store,
            fetcher,
            note: String::new(),
            selected_article: None,
            summary_override: None,
            submitting: false,
        }
    }

    pub fn store(&self) -> &NodeStore {
        &self.store
    }

    pub fn fetcher(&self) -> &SummaryFetcher {
        &self.fetcher
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn selected_article(&self) -> Option<&str> {
        self.selected_article.as_deref()
    }

    pub fn summary_override(&self) -> Option<&str> {
        self.summary_override.as_deref()
    }

    pub fn state(&self) -> FormState {
        if self.submitting {
            FormState::Submitting
        } else if self.selected_article.is_none() {
            FormState::Empty
        } else if self.note.trim().is_empty() {
            FormState::ArticleSelected
        } else {
            FormState::Submittable
        }
    }

    pub fn can_submit(&self) -> bool {
        self.state() == FormState::Submittable && !self.fetcher.is_loading()
    }

    pub fn view(&self) -> FormView {
        FormView {
            state: self.state(),
            note: self.note.clone(),
            selected_article: self.selected_article.clone(),
            summary_override: self.summary_override.clone(),
            can_submit: self.can_submit(),
        }
    }

    pub fn set_title(&self, title: impl Into<String>) {
        self.store.set_title(title);
    }

    /// Edits are refused while a submission is in flight; its reset would
    /// discard them.
    pub fn ensure_editable(&self) -> Result<(), ComposeError> {
        if self.submitting {
            return Err(ComposeError::AlreadySubmitting);
        }
        Ok(())
    }

    /// Replace the note text. A newly added mention selects its article when
    /// none is selected yet.
    pub fn set_note(&mut self, note: impl Into<String>) -> Result<(), ComposeError> {
        self.ensure_editable()?;
        let note = note.into();
        if self.selected_article.is_none() {
            if let Some(mention) = added_mentions(&self.note, &note).pop() {
                self.select_article(mention.id)?;
            }
        }
        self.note = note;
        Ok(())
    }

    pub fn select_article(&mut self, title: impl Into<String>) -> Result<(), ComposeError> {
        self.ensure_editable()?;
        let title = title.into();
        if self.selected_article.as_deref() != Some(title.as_str()) {
            self.summary_override = None;
        }
        self.selected_article = Some(title);
        Ok(())
    }

    /// Drop the selected article along with any override captured for it.
    pub fn clear_article(&mut self) -> Result<(), ComposeError> {
        self.ensure_editable()?;
        self.selected_article = None;
        self.summary_override = None;
        Ok(())
    }

    pub fn apply_override(&mut self, text: impl Into<String>) -> Result<(), ComposeError> {
        self.ensure_editable()?;
        self.summary_override = Some(text.into());
        Ok(())
    }

    /// Validate and capture the form, entering `Submitting`.
    pub fn begin_submit(&mut self) -> Result<SubmitTicket, ComposeError> {
        if self.submitting {
            return Err(ComposeError::AlreadySubmitting);
        }
        if !self.can_submit() {
            return Err(ComposeError::NotSubmittable);
        }
        let title = self
            .selected_article
            .clone()
            .ok_or(ComposeError::NotSubmittable)?;

        self.submitting = true;
        Ok(SubmitTicket {
            title,
            note: self.note.trim().to_string(),
            summary_override: self.summary_override.clone(),
        })
    }

    /// Append the node built from `ticket` and `fetched`, then reset the form.
    pub fn finish_submit(&mut self, ticket: SubmitTicket, fetched: ArticleSummary) -> Node {
        let node = ticket.into_node(fetched);
        self.store.add_node(node.clone());
        self.reset();
        node
    }

    /// Leave `Submitting` without adding anything, keeping the form contents.
    fn abort_submit(&mut self) {
        self.submitting = false;
    }

    pub async fn submit(&mut self) -> Result<Node, ComposeError> {
        let ticket = self.begin_submit()?;
        let fetched = self.fetcher.fetch_summary(&ticket.title).await;
        Ok(self.finish_submit(ticket, fetched))
    }

    fn reset(&mut self) {
        self.note.clear();
        self.selected_article = None;
        self.summary_override = None;
        self.submitting = false;
    }
}

/// Submit a form shared behind a lock.
///
/// The lock is released while the summary is fetched so the form stays
/// observable as `Submitting`. The fetch and the append run in their own task:
/// if the caller goes away mid-fetch the node is still added and the form still
/// resets.
pub async fn submit_shared(form: &SharedComposer) -> Result<Node, ComposeError> {
    let (ticket, fetcher) = {
        let mut guard = form.lock().await;
        let ticket = guard.begin_submit()?;
        (ticket, guard.fetcher().clone())
    };

    let shared = form.clone();
    let task = tokio::spawn(async move {
        let fetched = fetcher.fetch_summary(&ticket.title).await;
        shared.lock().await.finish_submit(ticket, fetched)
    });

    match task.await {
        Ok(node) => Ok(node),
        Err(e) => {
            tracing::error!("Submission task failed: {}", e);
            form.lock().await.abort_submit();
            Err(ComposeError::Interrupted(e.to_string()))
        }
    }
}
