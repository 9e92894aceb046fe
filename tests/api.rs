//! End-to-end tests for the leaderboard HTTP surface.
//!
//! Each test builds the real axum `Router` over an in-memory libsql database
//! and sends requests with `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use chrono::{DateTime, Utc};
use highscores::api::ScoreDto;
use highscores::db::Database;
use highscores::error::StoreError;
use highscores::model::{HighScore, NewHighScore};
use highscores::scores::ScoreGateway;
use highscores::store::{LibsqlScoreStore, ScoreStore};
use serde_json::{Value, json};
use tower::ServiceExt;

struct TestApp {
    router: Router,
    db: Arc<Database>,
}

impl TestApp {
    async fn new() -> Self {
        let db = Arc::new(Database::in_memory().await.unwrap());
        let router = highscores::app(ScoreGateway::new(LibsqlScoreStore::new(db.clone())));
        TestApp { router, db }
    }

    async fn count(&self) -> u64 {
        LibsqlScoreStore::new(self.db.clone()).count().await.unwrap()
    }

    async fn insert_at(&self, name: &str, score: i32, timestamp: &str) {
        self.db
            .connection()
            .execute(
                "INSERT INTO high_scores (player_name, score, level, timestamp) VALUES (?, ?, 1, ?)",
                libsql::params![name, score, timestamp],
            )
            .await
            .unwrap();
    }

    async fn send(&self, method: Method, uri: &str, body: Body) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(body)
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn post(&self, payload: Value) -> (StatusCode, Value) {
        self.send(Method::POST, "/api/scores/", Body::from(payload.to_string()))
            .await
    }

    async fn list(&self) -> Vec<ScoreDto> {
        let (status, json) = self.send(Method::GET, "/api/scores/", Body::empty()).await;
        assert_eq!(status, StatusCode::OK);
        serde_json::from_value(json).unwrap()
    }
}

#[tokio::test]
async fn post_returns_created_record_with_server_fields() {
    let app = TestApp::new().await;
    let before = Utc::now();

    let (status, json) = app
        .post(json!({
            "id": 4242,
            "timestamp": "2001-01-01T00:00:00Z",
            "player_name": "blinky",
            "score": 1500,
            "level": 3,
        }))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    let dto: ScoreDto = serde_json::from_value(json).unwrap();
    assert_ne!(dto.id, 4242);
    assert_eq!(dto.player_name, "blinky");
    assert_eq!(dto.score, 1500);
    assert_eq!(dto.level, 3);

    let ts: DateTime<Utc> = dto.timestamp.parse().unwrap();
    assert!((ts - before).num_seconds().abs() < 5);
}

#[tokio::test]
async fn post_without_body_uses_defaults() {
    let app = TestApp::new().await;

    let (status, json) = app.send(Method::POST, "/api/scores/", Body::empty()).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["player_name"], "PacFan");
    assert_eq!(json["score"], 0);
    assert_eq!(json["level"], 1);
    assert!(json["id"].is_i64());
}

#[tokio::test]
async fn long_player_name_is_rejected_and_not_stored() {
    let app = TestApp::new().await;

    let (status, json) = app
        .post(json!({ "player_name": "p".repeat(51), "score": 10 }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json,
        json!({ "player_name": ["Ensure this field has no more than 50 characters."] })
    );
    assert_eq!(app.count().await, 0);
}

#[tokio::test]
async fn non_integer_score_is_rejected() {
    let app = TestApp::new().await;

    let (status, json) = app.post(json!({ "score": "abc" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["score"], json!(["A valid integer is required."]));
    assert_eq!(app.count().await, 0);
}

#[tokio::test]
async fn nul_in_player_name_is_rejected_and_not_stored() {
    let app = TestApp::new().await;

    let (status, json) = app.post(json!({ "player_name": "a\u{0}b", "score": 5 })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json, json!({ "player_name": ["Null characters are not allowed."] }));
    assert_eq!(app.count().await, 0);
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = TestApp::new().await;

    let (status, json) = app
        .send(Method::POST, "/api/scores/", Body::from("{\"score\": 1"))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["detail"].as_str().unwrap().starts_with("JSON parse error"));
}

#[tokio::test]
async fn listing_orders_by_score_descending() {
    let app = TestApp::new().await;
    for score in [100, 50, 300] {
        let (status, _) = app.post(json!({ "score": score })).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let scores: Vec<i32> = app.list().await.iter().map(|s| s.score).collect();
    assert_eq!(scores, vec![300, 100, 50]);
}

#[tokio::test]
async fn equal_scores_list_latest_first() {
    let app = TestApp::new().await;
    app.insert_at("older", 700, "2026-10-16T08:00:00.000000Z").await;
    app.insert_at("newer", 700, "2026-10-16T08:00:05.000000Z").await;

    let names: Vec<String> = app.list().await.into_iter().map(|s| s.player_name).collect();
    assert_eq!(names, vec!["newer", "older"]);
}

#[tokio::test]
async fn listing_returns_only_the_top_ten() {
    let app = TestApp::new().await;
    for score in [5, 80, 12, 64, 3, 99, 41, 27, 70, 15, 58, 9, 33, 88, 1] {
        app.post(json!({ "score": score })).await;
    }
    assert_eq!(app.count().await, 15);

    let scores: Vec<i32> = app.list().await.iter().map(|s| s.score).collect();
    assert_eq!(scores, vec![99, 88, 80, 70, 64, 58, 41, 33, 27, 15]);
}

#[tokio::test]
async fn head_is_served_like_get() {
    let app = TestApp::new().await;
    app.post(json!({ "score": 10 })).await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::HEAD)
                .uri("/api/scores/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
}

#[tokio::test]
async fn unsupported_method_is_405() {
    let app = TestApp::new().await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::DELETE)
                .uri("/api/scores/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[header::ALLOW], "GET, HEAD, POST");
}

#[tokio::test]
async fn undefined_paths_are_404() {
    let app = TestApp::new().await;

    for uri in ["/api/scores/123", "/api/scores", "/nope", "/static/missing.js"] {
        let (status, json) = app.send(Method::GET, uri, Body::empty()).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "uri {uri}");
        assert_eq!(json, json!({ "detail": "Not found." }));
    }
}

#[tokio::test]
async fn index_serves_the_game_page() {
    let app = TestApp::new().await;

    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/html"));
}

#[tokio::test]
async fn static_assets_are_served_with_mime_type() {
    let app = TestApp::new().await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/static/js/leaderboard.js")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.contains("javascript"));
}

struct UnavailableStore;

impl ScoreStore for UnavailableStore {
    async fn insert(&self, _new: NewHighScore) -> Result<HighScore, StoreError> {
        Err(StoreError::NoRowReturned)
    }

    async fn query_top(&self, _limit: u32) -> Result<Vec<HighScore>, StoreError> {
        Err(StoreError::Decode("disk on fire".to_owned()))
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(0)
    }
}

#[tokio::test]
async fn storage_failures_are_500_without_details() {
    let router = highscores::app(ScoreGateway::new(UnavailableStore));

    for (method, body) in [(Method::GET, Body::empty()), (Method::POST, Body::from("{}"))] {
        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri("/api/scores/")
                    .body(body)
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json, json!({ "detail": "A server error occurred." }));
    }
}
