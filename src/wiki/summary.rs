use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::WikiClient;
use crate::models::ArticleSummary;

/// Summary fetcher that never fails.
///
/// Errors degrade to [`ArticleSummary::placeholder`] and the message lands in an
/// observable error slot. The slot holds only the latest message and is cleared
/// when the next fetch starts. Handles are cheap to clone and share the slot and
/// the loading counter.
#[derive(Debug, Clone)]
pub struct SummaryFetcher {
    client: WikiClient,
    error: Arc<Mutex<Option<String>>>,
    in_flight: Arc<AtomicUsize>,
}

/// Decrements the in-flight counter when the fetch future completes or is dropped.
struct Loading(Arc<AtomicUsize>);

impl Loading {
    fn start(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter.clone())
    }
}

impl Drop for Loading {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl SummaryFetcher {
    pub fn new(client: WikiClient) -> Self {
        Self {
            client,
            error: Arc::new(Mutex::new(None)),
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn client(&self) -> &WikiClient {
        &self.client
    }

    /// Fetch the summary for `title`, or a placeholder carrying `title` on failure.
    pub async fn fetch_summary(&self, title: &str) -> ArticleSummary {
        self.fetch_with_error(title).await.0
    }

    /// Like [`fetch_summary`](Self::fetch_summary), also returning this call's
    /// own error message. The shared slot may already hold another call's.
    pub async fn fetch_with_error(&self, title: &str) -> (ArticleSummary, Option<String>) {
        let _loading = Loading::start(&self.in_flight);
        self.set_error(None);

        match self.client.summary(title).await {
            Ok(summary) => (summary, None),
            Err(e) => {
                tracing::warn!("Failed to fetch summary for {:?}: {}", title, e);
                let message = format!("Failed to fetch summary: {}", e);
                self.set_error(Some(message.clone()));
                (ArticleSummary::placeholder(title), Some(message))
            }
        }
    }

    /// Message from the most recent failed fetch, if the latest fetch failed.
    pub fn error(&self) -> Option<String> {
        self.error.lock().expect("error slot lock poisoned").clone()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    fn set_error(&self, message: Option<String>) {
        *self.error.lock().expect("error slot lock poisoned") = message;
    }
}
