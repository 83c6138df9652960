mod common;

use std::time::Duration;

use axum::http::StatusCode;
use axum_test::TestServer;
use common::{spawn_fake_wiki, FakeWiki, EINSTEIN_EXTRACT, EINSTEIN_FULL_TEXT, SLOW_EXTRACT};
use rabbit_hole::api::{create_router, AppState};
use rabbit_hole::compose::{FormState, FormView, PickerView};
use rabbit_hole::models::*;
use rabbit_hole::wiki::WikiClient;
use serde_json::{json, Value};

const DEBOUNCE: Duration = Duration::from_millis(20);

fn setup() -> (TestServer, FakeWiki) {
    let (server, _state, wiki) = setup_with_state();
    (server, wiki)
}

/// Like [`setup`], but keeps a handle on the shared state.
fn setup_with_state() -> (TestServer, AppState, FakeWiki) {
    let wiki = spawn_fake_wiki();
    let state = AppState::new(WikiClient::new(&wiki.base_url), DEBOUNCE);
    let server =
        TestServer::new(create_router(state.clone())).expect("Failed to create test server");
    (server, state, wiki)
}

/// Wait out the debounce and the fake server's reply.
async fn settle() {
    tokio::time::sleep(DEBOUNCE + Duration::from_millis(300)).await;
}

async fn add_node(server: &TestServer, title: &str, note: &str) -> Node {
    server
        .put("/api/v1/form/article")
        .json(&json!({ "title": title }))
        .await
        .assert_status_ok();
    server
        .put("/api/v1/form/note")
        .json(&json!({ "note": note }))
        .await
        .assert_status_ok();
    let response = server.post("/api/v1/form/submit").await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Node>()
}

mod health {
    use super::*;

    #[tokio::test]
    async fn reports_ok() {
        let (server, _wiki) = setup();
        let response = server.get("/api/v1/health").await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), json!({ "status": "ok" }));
    }
}

mod session {
    use super::*;

    #[tokio::test]
    async fn starts_empty() {
        let (server, _wiki) = setup();
        let session: SessionState = server.get("/api/v1/session").await.json();
        assert_eq!(session, SessionState::default());
    }

    #[tokio::test]
    async fn sets_title() {
        let (server, _wiki) = setup();

        server
            .put("/api/v1/session/title")
            .json(&json!({ "title": "Physics" }))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let session: SessionState = server.get("/api/v1/session").await.json();
        assert_eq!(session.title, "Physics");
    }

    #[tokio::test]
    async fn renders_as_text() {
        let (server, _wiki) = setup();
        add_node(&server, "Mars", "red").await;

        let text = server.get("/api/v1/session/text").await.text();

        assert!(text.starts_with("Untitled rabbit hole\n"));
        assert!(text.contains("└── [0] Mars\n"));
        assert!(text.contains("note: red\n"));
    }
}

mod form {
    use super::*;

    #[tokio::test]
    async fn walks_through_states() {
        let (server, _wiki) = setup();

        let view: FormView = server.get("/api/v1/form").await.json();
        assert_eq!(view.state, FormState::Empty);
        assert!(!view.can_submit);

        let view: FormView = server
            .put("/api/v1/form/article")
            .json(&json!({ "title": "Mars" }))
            .await
            .json();
        assert_eq!(view.state, FormState::ArticleSelected);

        let view: FormView = server
            .put("/api/v1/form/note")
            .json(&json!({ "note": "red" }))
            .await
            .json();
        assert_eq!(view.state, FormState::Submittable);
        assert!(view.can_submit);

        let view: FormView = server.delete("/api/v1/form/article").await.json();
        assert_eq!(view.state, FormState::Empty);
        assert_eq!(view.note, "red");
    }

    #[tokio::test]
    async fn submits_trimmed_note() {
        let (server, _wiki) = setup();

        let node = add_node(&server, "Albert Einstein", "  physicist  ").await;

        assert_eq!(node.note, "physicist");
        assert_eq!(node.article.title, "Albert Einstein");
        assert_eq!(node.article.summary, EINSTEIN_EXTRACT);

        let view: FormView = server.get("/api/v1/form").await.json();
        assert_eq!(view.state, FormState::Empty);
    }

    #[tokio::test]
    async fn rejects_incomplete_submission() {
        let (server, _wiki) = setup();

        server
            .put("/api/v1/form/article")
            .json(&json!({ "title": "Mars" }))
            .await;
        let response = server.post("/api/v1/form/submit").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let session: SessionState = server.get("/api/v1/session").await.json();
        assert!(session.nodes.is_empty());
    }

    #[tokio::test]
    async fn override_wins_on_submit() {
        let (server, _wiki) = setup();

        server
            .put("/api/v1/form/article")
            .json(&json!({ "title": "Albert Einstein" }))
            .await;
        server
            .put("/api/v1/form/note")
            .json(&json!({ "note": "physicist" }))
            .await;
        let view: FormView = server
            .put("/api/v1/form/override")
            .json(&json!({ "text": "  Born in 1879 " }))
            .await
            .json();
        assert_eq!(view.summary_override.as_deref(), Some("Born in 1879"));

        let node: Node = server.post("/api/v1/form/submit").await.json();
        assert_eq!(node.article.summary, "Born in 1879");
    }

    #[tokio::test]
    async fn rejects_empty_override() {
        let (server, _wiki) = setup();

        server
            .put("/api/v1/form/article")
            .json(&json!({ "title": "Mars" }))
            .await;
        server
            .put("/api/v1/form/override")
            .json(&json!({ "text": "   " }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn refuses_edits_while_submitting() {
        let (server, _wiki) = setup();
        server
            .put("/api/v1/form/article")
            .json(&json!({ "title": "Slow" }))
            .await;
        server
            .put("/api/v1/form/note")
            .json(&json!({ "note": "patience" }))
            .await;

        let (submitted, edited) = tokio::join!(async { server.post("/api/v1/form/submit").await }, async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            server
                .put("/api/v1/form/note")
                .json(&json!({ "note": "edited" }))
                .await
        });

        edited.assert_status(StatusCode::CONFLICT);
        submitted.assert_status(StatusCode::CREATED);
        let node: Node = submitted.json();
        assert_eq!(node.note, "patience");
        assert_eq!(node.article.summary, SLOW_EXTRACT);
    }

    #[tokio::test]
    async fn rejects_override_without_article() {
        let (server, _wiki) = setup();

        server
            .put("/api/v1/form/override")
            .json(&json!({ "text": "Born in 1879" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}

mod nodes {
    use super::*;

    #[tokio::test]
    async fn removes_by_index() {
        let (server, _wiki) = setup();
        add_node(&server, "Mars", "red").await;
        let venus = add_node(&server, "Venus", "hot").await;

        server
            .delete("/api/v1/nodes/0")
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let session: SessionState = server.get("/api/v1/session").await.json();
        assert_eq!(session.nodes, vec![venus]);
    }

    #[tokio::test]
    async fn remove_out_of_range_is_not_found() {
        let (server, _wiki) = setup();
        add_node(&server, "Mars", "red").await;

        server
            .delete("/api/v1/nodes/5")
            .await
            .assert_status(StatusCode::NOT_FOUND);

        let session: SessionState = server.get("/api/v1/session").await.json();
        assert_eq!(session.nodes.len(), 1);
    }

    #[tokio::test]
    async fn updates_summary_from_selection() {
        let (server, _wiki) = setup();
        let mars = add_node(&server, "Mars", "red").await;

        let node: Node = server
            .put("/api/v1/nodes/0/summary")
            .json(&json!({ "text": "fourth planet" }))
            .await
            .json();

        assert_eq!(node.article.summary, "fourth planet");
        assert_eq!(node.article.title, mars.article.title);
        assert_eq!(node.note, mars.note);
    }

    #[tokio::test]
    async fn summary_update_does_not_wait_on_the_form() {
        let (server, state, _wiki) = setup_with_state();
        state.store.add_node(Node {
            article: ArticleSummary::placeholder("Mars"),
            note: "red".to_string(),
        });
        let _form = state.form.lock().await;

        let response = tokio::time::timeout(
            Duration::from_secs(1),
            async {
                server
                    .put("/api/v1/nodes/0/summary")
                    .json(&json!({ "text": "fourth planet" }))
                    .await
            },
        )
        .await
        .expect("Summary update blocked on the form lock");

        response.assert_status_ok();
        assert_eq!(state.store.snapshot().nodes[0].article.summary, "fourth planet");
    }

    #[tokio::test]
    async fn summary_update_out_of_range_is_not_found() {
        let (server, _wiki) = setup();

        server
            .put("/api/v1/nodes/0/summary")
            .json(&json!({ "text": "fourth planet" }))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}

mod articles {
    use super::*;

    #[tokio::test]
    async fn searches() {
        let (server, _wiki) = setup();

        let results: Vec<SearchResult> = server
            .get("/api/v1/search")
            .add_query_param("q", "Alb")
            .await
            .json();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].title, "Albert Einstein");
    }

    #[tokio::test]
    async fn empty_search_skips_wikipedia() {
        let (server, wiki) = setup();

        let results: Vec<SearchResult> = server.get("/api/v1/search").await.json();

        assert!(results.is_empty());
        assert_eq!(wiki.hits(), 0);
    }

    #[tokio::test]
    async fn summary_of_missing_article_carries_error() {
        let (server, _wiki) = setup();

        let body: Value = server
            .get("/api/v1/articles/No%20Such%20Article/summary")
            .await
            .json();

        assert_eq!(body["article"]["title"], "No Such Article");
        assert_eq!(body["article"]["summary"], "");
        assert!(body["article"].get("thumbnail").is_none());
        assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
    }

    #[tokio::test]
    async fn concurrent_summaries_report_their_own_errors() {
        let (server, _wiki) = setup();

        let (slow, missing) = tokio::join!(
            async { server.get("/api/v1/articles/Slow/summary").await },
            async {
                tokio::time::sleep(Duration::from_millis(50)).await;
                server.get("/api/v1/articles/Missing/summary").await
            }
        );

        let slow: Value = slow.json();
        let missing: Value = missing.json();
        assert_eq!(slow["article"]["summary"], SLOW_EXTRACT);
        assert!(slow["error"].is_null());
        assert!(missing["error"].as_str().is_some_and(|e| !e.is_empty()));
    }

    #[tokio::test]
    async fn full_text() {
        let (server, _wiki) = setup();

        let body: Value = server
            .get("/api/v1/articles/Albert%20Einstein/text")
            .await
            .json();

        assert_eq!(body["title"], "Albert Einstein");
        assert_eq!(body["content"], EINSTEIN_FULL_TEXT);
    }
}

mod form_search {
    use super::*;

    #[tokio::test]
    async fn debounces_keystrokes() {
        let (server, wiki) = setup();

        for term in ["A", "Al", "Alb"] {
            server
                .put("/api/v1/form/search")
                .json(&json!({ "term": term }))
                .await
                .assert_status(StatusCode::ACCEPTED);
        }
        settle().await;

        let view: PickerView = server.get("/api/v1/form/search").await.json();
        assert!(view.open);
        assert_eq!(view.results.len(), 3);
        assert_eq!(view.results[0].title, "Albert Einstein");
        assert_eq!(wiki.hits(), 1);
    }

    #[tokio::test]
    async fn keyboard_selects_the_article() {
        let (server, _wiki) = setup();
        server
            .put("/api/v1/form/search")
            .json(&json!({ "term": "Alb" }))
            .await;
        settle().await;

        server
            .post("/api/v1/form/search/key")
            .json(&json!({ "key": "down" }))
            .await
            .assert_status_ok();
        let view: FormView = server
            .post("/api/v1/form/search/key")
            .json(&json!({ "key": "enter" }))
            .await
            .json();

        assert_eq!(view.selected_article.as_deref(), Some("Albert Einstein"));
        assert_eq!(view.state, FormState::ArticleSelected);
        let picker: PickerView = server.get("/api/v1/form/search").await.json();
        assert!(!picker.open);
    }

    #[tokio::test]
    async fn click_selects_by_position() {
        let (server, _wiki) = setup();
        server
            .put("/api/v1/form/search")
            .json(&json!({ "term": "Alb" }))
            .await;
        settle().await;

        let view: FormView = server.post("/api/v1/form/search/pick/2").await.json();
        assert_eq!(view.selected_article.as_deref(), Some("Albania"));

        server
            .post("/api/v1/form/search/pick/7")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn mentions_stop_searching_once_an_article_is_selected() {
        let (server, wiki) = setup();
        server
            .put("/api/v1/form/article")
            .json(&json!({ "title": "Mars" }))
            .await;

        server
            .put("/api/v1/form/mention")
            .json(&json!({ "query": "Alb" }))
            .await
            .assert_status(StatusCode::ACCEPTED);
        settle().await;

        let view: PickerView = server.get("/api/v1/form/search").await.json();
        assert!(view.results.is_empty());
        assert_eq!(wiki.hits(), 0);
    }
}
