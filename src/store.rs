//! Session node store.
//!
//! The store is the only durable state of a session. Every write goes through
//! [`NodeStore::add_node`], [`NodeStore::update_node_summary`],
//! [`NodeStore::remove_node`] or [`NodeStore::set_title`]; readers either take a
//! [`snapshot`](NodeStore::snapshot) or [`subscribe`](NodeStore::subscribe) to be
//! woken on every effective change.
//!
//! Out-of-range indices are ignored rather than raised: the call returns `false`
//! and nothing changes. Indices are positional, so one taken before a removal
//! may be stale.

use std::sync::Arc;

use tokio::sync::watch;

use crate::models::{Node, SessionState};

#[derive(Debug, Clone)]
pub struct NodeStore {
    state: Arc<watch::Sender<SessionState>>,
}

impl NodeStore {
    /// Empty session: no title, no nodes.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(SessionState::default());
        Self { state: Arc::new(tx) }
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn len(&self) -> usize {
        self.state.borrow().nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn title(&self) -> String {
        self.state.borrow().title.clone()
    }

    pub fn set_title(&self, title: impl Into<String>) {
        let title = title.into();
        self.state.send_if_modified(|state| {
            if state.title == title {
                return false;
            }
            state.title = title;
            true
        });
    }

    /// Append a node. The same article may appear any number of times.
    pub fn add_node(&self, node: Node) {
        tracing::info!("Adding {:?} to the rabbit hole", node.article.title);
        self.state.send_modify(|state| state.nodes.push(node));
    }

    /// Replace only `article.summary` of the node at `index`.
    pub fn update_node_summary(&self, index: usize, new_summary: impl Into<String>) -> bool {
        let new_summary = new_summary.into();
        let applied = self.state.send_if_modified(|state| match state.nodes.get_mut(index) {
            Some(node) => {
                node.article = node.article.with_summary(new_summary);
                true
            }
            None => false,
        });
        if !applied {
            tracing::debug!("Ignoring summary update for out-of-range node {}", index);
        }
        applied
    }

    /// Remove the node at `index`; later nodes shift down by one.
    pub fn remove_node(&self, index: usize) -> bool {
        let applied = self.state.send_if_modified(|state| {
            if index < state.nodes.len() {
                state.nodes.remove(index);
                true
            } else {
                false
            }
        });
        if !applied {
            tracing::debug!("Ignoring removal of out-of-range node {}", index);
        }
        applied
    }
}

impl Default for NodeStore {
    fn default() -> Self {
        Self::new()
    }
}
