//! Debounced search.
//!
//! A [`Debouncer`] keeps at most one scheduled task. Scheduling again aborts the
//! pending one before it fires. Once a task has fired its work runs detached, so
//! a network request already on the wire is never cancelled and responses can
//! arrive out of order.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::models::SearchResult;
use crate::wiki::WikiClient;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `task` after the quiet period unless another task is scheduled first.
    pub fn schedule<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(task);
        }));
    }

    /// Drop the pending task if it has not fired yet.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Results of one fired search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBatch {
    pub query: String,
    pub results: Vec<SearchResult>,
}

/// Keystroke-driven search: each [`input`](SearchBox::input) restarts the quiet
/// period, and only the last term within it reaches Wikipedia.
#[derive(Debug)]
pub struct SearchBox {
    client: WikiClient,
    debouncer: Debouncer,
    results: mpsc::UnboundedSender<SearchBatch>,
}

impl SearchBox {
    pub fn new(
        client: WikiClient,
        delay: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<SearchBatch>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let search_box = Self {
            client,
            debouncer: Debouncer::new(delay),
            results: tx,
        };
        (search_box, rx)
    }

    pub fn input(&mut self, term: impl Into<String>) {
        let query = term.into();
        let client = self.client.clone();
        let results = self.results.clone();
        self.debouncer.schedule(async move {
            tracing::debug!("Searching Wikipedia for {:?}", query);
            let found = client.search(&query).await;
            // The receiver going away just means nobody is listening anymore.
            let _ = results.send(SearchBatch {
                query,
                results: found,
            });
        });
    }

    pub fn cancel(&mut self) {
        self.debouncer.cancel();
    }
}
