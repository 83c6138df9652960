mod handlers;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tokio::sync::Mutex;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::compose::{Composer, SearchPanel, SharedComposer};
use crate::store::NodeStore;
use crate::wiki::{SummaryFetcher, WikiClient};

/// Shared state behind the router: one session, one composition form.
///
/// Handlers that need both take `search` before `form`.
#[derive(Clone)]
pub struct AppState {
    pub store: NodeStore,
    pub form: SharedComposer,
    /// Debounced article search feeding the form.
    pub search: Arc<Mutex<SearchPanel>>,
    /// Fetcher for ad-hoc article lookups, separate from the form's own so a
    /// lookup never blocks submission.
    pub lookups: SummaryFetcher,
}

impl AppState {
    /// Must be called from within a tokio runtime.
    pub fn new(client: WikiClient, debounce: Duration) -> Self {
        let store = NodeStore::new();
        let form = Composer::new(store.clone(), SummaryFetcher::new(client.clone()));
        Self {
            store,
            form: Arc::new(Mutex::new(form)),
            search: Arc::new(Mutex::new(SearchPanel::new(client.clone(), debounce))),
            lookups: SummaryFetcher::new(client),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        // Session
        .route("/session", get(handlers::get_session))
        .route("/session/text", get(handlers::get_session_text))
        .route("/session/title", put(handlers::set_title))
        // Nodes (by position)
        .route("/nodes/{index}", delete(handlers::remove_node))
        .route("/nodes/{index}/summary", put(handlers::update_node_summary))
        // Wikipedia
        .route("/search", get(handlers::search))
        .route("/articles/{title}/summary", get(handlers::get_article_summary))
        .route("/articles/{title}/text", get(handlers::get_article_text))
        // Composition form
        .route("/form", get(handlers::get_form))
        .route("/form/note", put(handlers::set_note))
        .route("/form/article", put(handlers::select_article))
        .route("/form/article", delete(handlers::clear_article))
        .route("/form/override", put(handlers::set_override))
        .route("/form/search", get(handlers::get_search_results))
        .route("/form/search", put(handlers::search_input))
        .route("/form/search/key", post(handlers::search_key))
        .route("/form/search/pick/{index}", post(handlers::search_pick))
        .route("/form/mention", put(handlers::mention_input))
        .route("/form/submit", post(handlers::submit))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
