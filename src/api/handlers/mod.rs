use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::compose::{submit_shared, ComposeError, FormView, PickerView};
use crate::models::{ArticleSummary, Node, SearchResult, SessionState};
use crate::overlay::{DetailOverlay, OverrideTarget};
use crate::picker::PickerKey;
use crate::render::render_session;

// ============================================================
// Request / Response Types
// ============================================================

#[derive(Debug, Deserialize, Serialize)]
pub struct TitleInput {
    pub title: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct NoteInput {
    pub note: String,
}

/// Text the user selected in the detail overlay.
#[derive(Debug, Deserialize, Serialize)]
pub struct SelectionInput {
    pub text: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SearchInput {
    pub term: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MentionInput {
    pub query: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct KeyInput {
    pub key: PickerKey,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SummaryResponse {
    pub article: ArticleSummary,
    /// Set when the fetch failed and `article` is a placeholder.
    pub error: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ArticleTextResponse {
    pub title: String,
    pub content: String,
}

// ============================================================
// Error Handling
// ============================================================

fn compose_error(e: ComposeError) -> (StatusCode, String) {
    tracing::warn!("Rejected submission: {}", e);
    let status = match e {
        ComposeError::NotSubmittable => StatusCode::BAD_REQUEST,
        ComposeError::AlreadySubmitting => StatusCode::CONFLICT,
        ComposeError::Interrupted(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, e.to_string())
}

fn node_not_found() -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, "Node not found".to_string())
}

fn empty_selection() -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, "Selection is empty".to_string())
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Session
// ============================================================

pub async fn get_session(State(state): State<AppState>) -> Json<SessionState> {
    Json(state.store.snapshot())
}

pub async fn get_session_text(State(state): State<AppState>) -> String {
    render_session(&state.store.snapshot())
}

pub async fn set_title(
    State(state): State<AppState>,
    Json(input): Json<TitleInput>,
) -> StatusCode {
    state.store.set_title(input.title);
    StatusCode::NO_CONTENT
}

// ============================================================
// Nodes
// ============================================================

pub async fn remove_node(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<StatusCode, (StatusCode, String)> {
    if state.store.remove_node(index) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(node_not_found())
    }
}

/// Confirm a detail-overlay selection against an existing node.
pub async fn update_node_summary(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(input): Json<SelectionInput>,
) -> Result<Json<Node>, (StatusCode, String)> {
    let title = state
        .store
        .snapshot()
        .nodes
        .get(index)
        .map(|n| n.article.title.clone())
        .ok_or_else(node_not_found)?;

    let mut overlay = DetailOverlay::open(title, OverrideTarget::Node(index));
    overlay.select(&input.text);
    let confirmation = overlay.confirm().ok_or_else(empty_selection)?;

    if !state
        .store
        .update_node_summary(index, confirmation.text)
    {
        return Err(node_not_found());
    }
    state
        .store
        .snapshot()
        .nodes
        .get(index)
        .cloned()
        .map(Json)
        .ok_or_else(node_not_found)
}

// ============================================================
// Wikipedia
// ============================================================

/// One-shot lookup. Keystroke-driven search for the form goes through
/// [`search_input`], which is debounced.
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<SearchResult>> {
    Json(state.lookups.client().search(&query.q).await)
}

pub async fn get_article_summary(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> Json<SummaryResponse> {
    let (article, error) = state.lookups.fetch_with_error(&title).await;
    Json(SummaryResponse { article, error })
}

pub async fn get_article_text(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> Json<ArticleTextResponse> {
    let mut overlay = DetailOverlay::open(title, OverrideTarget::Pending);
    overlay.load(state.lookups.client()).await;
    Json(ArticleTextResponse {
        content: overlay.content().unwrap_or_default().to_string(),
        title: overlay.title().to_string(),
    })
}

// ============================================================
// Composition Form
// ============================================================

pub async fn get_form(State(state): State<AppState>) -> Json<FormView> {
    Json(state.form.lock().await.view())
}

pub async fn set_note(
    State(state): State<AppState>,
    Json(input): Json<NoteInput>,
) -> Result<Json<FormView>, (StatusCode, String)> {
    let mut form = state.form.lock().await;
    form.set_note(input.note).map_err(compose_error)?;
    Ok(Json(form.view()))
}

pub async fn select_article(
    State(state): State<AppState>,
    Json(input): Json<TitleInput>,
) -> Result<Json<FormView>, (StatusCode, String)> {
    let mut form = state.form.lock().await;
    form.select_article(input.title).map_err(compose_error)?;
    Ok(Json(form.view()))
}

pub async fn clear_article(
    State(state): State<AppState>,
) -> Result<Json<FormView>, (StatusCode, String)> {
    let mut form = state.form.lock().await;
    form.clear_article().map_err(compose_error)?;
    Ok(Json(form.view()))
}

/// Confirm a detail-overlay selection for the article being composed.
pub async fn set_override(
    State(state): State<AppState>,
    Json(input): Json<SelectionInput>,
) -> Result<Json<FormView>, (StatusCode, String)> {
    let mut form = state.form.lock().await;
    form.ensure_editable().map_err(compose_error)?;
    let title = form.selected_article().map(str::to_string).ok_or((
        StatusCode::BAD_REQUEST,
        "No article selected".to_string(),
    ))?;

    let mut overlay = DetailOverlay::open(title, OverrideTarget::Pending);
    overlay.select(&input.text);
    let confirmation = overlay.confirm().ok_or_else(empty_selection)?;
    confirmation.apply(&state.store, &mut form);
    Ok(Json(form.view()))
}

/// Submit the form. The append happens even if the client disconnects
/// while the summary is being fetched.
pub async fn submit(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Node>), (StatusCode, String)> {
    let node = submit_shared(&state.form).await.map_err(compose_error)?;
    Ok((StatusCode::CREATED, Json(node)))
}

// ============================================================
// Form Search
// ============================================================

pub async fn get_search_results(State(state): State<AppState>) -> Json<PickerView> {
    Json(state.search.lock().await.view())
}

/// Search-box keystroke. Results arrive after the debounce delay.
pub async fn search_input(
    State(state): State<AppState>,
    Json(input): Json<SearchInput>,
) -> StatusCode {
    state.search.lock().await.input(input.term);
    StatusCode::ACCEPTED
}

/// `@`-mention query typed into the note.
pub async fn mention_input(
    State(state): State<AppState>,
    Json(input): Json<MentionInput>,
) -> StatusCode {
    let mut search = state.search.lock().await;
    let form = state.form.lock().await;
    search.mention_input(input.query, &form);
    StatusCode::ACCEPTED
}

pub async fn search_key(
    State(state): State<AppState>,
    Json(input): Json<KeyInput>,
) -> Result<Json<FormView>, (StatusCode, String)> {
    let mut search = state.search.lock().await;
    let mut form = state.form.lock().await;
    search.key(input.key, &mut form).map_err(compose_error)?;
    Ok(Json(form.view()))
}

pub async fn search_pick(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<FormView>, (StatusCode, String)> {
    let mut search = state.search.lock().await;
    let mut form = state.form.lock().await;
    search
        .pick(index, &mut form)
        .map_err(compose_error)?
        .ok_or((StatusCode::NOT_FOUND, "No such search result".to_string()))?;
    Ok(Json(form.view()))
}
