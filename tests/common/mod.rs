//! Local stand-in for the Wikipedia endpoints the client talks to.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

pub const EINSTEIN_EXTRACT: &str = "Albert Einstein was a German-born theoretical physicist.";
pub const EINSTEIN_FULL_TEXT: &str =
    "Albert Einstein was a German-born theoretical physicist.\n\nLife\nBorn in 1879 in Ulm.";

pub const SLOW_EXTRACT: &str = "Slow but fine.";
/// How long the `Slow` summary takes to answer.
pub const SLOW_DELAY: Duration = Duration::from_millis(400);

pub struct FakeWiki {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
}

impl FakeWiki {
    /// Number of requests the server has answered.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Start the fake server on its own runtime thread so it works from both
/// `#[tokio::test]` and `tokio_test::block_on`.
pub fn spawn_fake_wiki() -> FakeWiki {
    let hits = Arc::new(AtomicUsize::new(0));
    let (tx, rx) = std::sync::mpsc::channel();

    let counter = hits.clone();
    std::thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().expect("Failed to build runtime");
        rt.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("Failed to bind fake wiki");
            tx.send(listener.local_addr().expect("No local address"))
                .expect("Failed to report address");
            axum::serve(listener, router(counter))
                .await
                .expect("Fake wiki crashed");
        });
    });

    let addr = rx.recv().expect("Fake wiki did not start");
    FakeWiki {
        base_url: format!("http://{}", addr),
        hits,
    }
}

fn router(hits: Arc<AtomicUsize>) -> Router {
    Router::new()
        .route("/api/rest_v1/page/summary/{title}", get(summary))
        .route("/w/api.php", get(action))
        .with_state(hits)
}

async fn summary(State(hits): State<Arc<AtomicUsize>>, Path(title): Path<String>) -> Response {
    hits.fetch_add(1, Ordering::SeqCst);
    match title.as_str() {
        "Albert_Einstein" => Json(json!({
            "title": "Albert Einstein",
            "extract": EINSTEIN_EXTRACT,
            "thumbnail": {
                "source": "https://upload.example/einstein.jpg",
                "width": 320,
                "height": 400
            }
        }))
        .into_response(),
        "Mars" => Json(json!({
            "title": "Mars",
            "extract": "Mars is the fourth planet from the Sun."
        }))
        .into_response(),
        "Slow" => {
            tokio::time::sleep(SLOW_DELAY).await;
            Json(json!({ "title": "Slow", "extract": SLOW_EXTRACT })).into_response()
        }
        "Broken" => (StatusCode::OK, "not json").into_response(),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({ "title": "Not found.", "type": "not_found" })),
        )
            .into_response(),
    }
}

async fn action(
    State(hits): State<Arc<AtomicUsize>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    hits.fetch_add(1, Ordering::SeqCst);
    let param = |key: &str| params.get(key).map(String::as_str).unwrap_or_default();

    if param("generator") == "prefixsearch" {
        return prefix_search(param("gpssearch"));
    }
    if param("prop") == "extracts" {
        return extracts(param("titles"));
    }
    (StatusCode::BAD_REQUEST, "unsupported").into_response()
}

fn page(title: &str, index: i64) -> Value {
    json!({ "title": title, "index": index, "description": format!("{} description", title) })
}

fn prefix_search(query: &str) -> Response {
    let pages: Vec<Value> = match query {
        "Alb" => vec![
            page("Albania", 3),
            json!({
                "title": "Albert Einstein",
                "index": 1,
                "description": "German-born physicist (1879-1955)",
                "thumbnail": { "source": "https://upload.example/einstein-160.jpg" }
            }),
            json!({ "title": "Albatross", "index": 2 }),
        ],
        "Many" => (0..15).rev().map(|i| page(&format!("Many {}", i), i + 1)).collect(),
        "Dup" => vec![
            page("Dup late", 40),
            page("Dup tie first", 7),
            page("Dup early", 2),
            page("Dup tie second", 7),
        ],
        "Boom" => return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        _ => return Json(json!({ "batchcomplete": true })).into_response(),
    };
    Json(json!({ "batchcomplete": true, "query": { "pages": pages } })).into_response()
}

fn extracts(title: &str) -> Response {
    match title {
        "Albert Einstein" => Json(json!({
            "query": { "pages": { "736": {
                "pageid": 736,
                "title": "Albert Einstein",
                "extract": EINSTEIN_FULL_TEXT
            } } }
        }))
        .into_response(),
        "Boom" => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        _ => Json(json!({
            "query": { "pages": { "-1": { "ns": 0, "title": title, "missing": "" } } }
        }))
        .into_response(),
    }
}
