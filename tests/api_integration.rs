//! Integration tests for the coach REST API.
//!
//! Each test spins up an Axum server on a random port backed by an
//! in-memory libSQL store and exercises the real HTTP contract.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::time::timeout;

use wellness_coach::api::{AppState, routes};
use wellness_coach::chat::SessionOptions;
use wellness_coach::coach::ResponseSelector;
use wellness_coach::store::{Database, LibSqlBackend};

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Start an Axum server on a random port, return (base url, db).
async fn start_server() -> (String, Arc<dyn Database>) {
    let db: Arc<dyn Database> = Arc::new(LibSqlBackend::new_memory().await.unwrap());
    let app = routes(AppState {
        db: Arc::clone(&db),
        selector: Arc::new(ResponseSelector::with_chooser(|_len: usize| 0)),
        options: SessionOptions::default(),
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Give the server a moment to start accepting connections.
    tokio::time::sleep(Duration::from_millis(50)).await;

    (format!("http://127.0.0.1:{port}"), db)
}

async fn put_alex(client: &reqwest::Client, base: &str) {
    let resp = client
        .put(format!("{base}/api/users/alex/profile"))
        .json(&json!({
            "full_name": "Alex Smith",
            "gender": "male",
            "fitness_goal": "muscle_building",
            "bmi": 27.0,
            "total_points": 10
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn health_endpoint() {
    timeout(TEST_TIMEOUT, async {
        let (base, _db) = start_server().await;
        let body: Value = reqwest::get(format!("{base}/health"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "wellness-coach");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn empty_history_shows_welcome() {
    timeout(TEST_TIMEOUT, async {
        let (base, _db) = start_server().await;
        let client = reqwest::Client::new();
        put_alex(&client, &base).await;

        let body: Value = client
            .get(format!("{base}/api/users/alex/chat"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let entries = body["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["role"], "assistant");
        let welcome = entries[0]["content"].as_str().unwrap();
        assert!(welcome.starts_with("Hi Alex!"));
        assert!(welcome.contains("I see your goal is muscle building."));
        assert!(welcome.contains("healthy weight management"));
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn chat_turn_persists_and_awards_points() {
    timeout(TEST_TIMEOUT, async {
        let (base, db) = start_server().await;
        let client = reqwest::Client::new();
        put_alex(&client, &base).await;

        let body: Value = client
            .post(format!("{base}/api/users/alex/chat"))
            .json(&json!({ "message": "Any WORKOUT tips?" }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["topic"], "workout");
        assert_eq!(body["persisted"], true);
        assert!(body["response"].as_str().unwrap().contains("**Push Day:**"));

        let awards = db.list_point_awards("alex").await.unwrap();
        assert_eq!(awards.len(), 1);
        assert_eq!(awards[0].points, 2);
        assert_eq!(awards[0].source, "ai_chat");

        // History replaces the welcome on the next load.
        let body: Value = client
            .get(format!("{base}/api/users/alex/chat"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let entries = body["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["role"], "user");
        assert_eq!(entries[0]["content"], "Any WORKOUT tips?");
        assert_eq!(entries[1]["role"], "assistant");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn dashboard_reflects_chat_points() {
    timeout(TEST_TIMEOUT, async {
        let (base, _db) = start_server().await;
        let client = reqwest::Client::new();
        put_alex(&client, &base).await;

        client
            .post(format!("{base}/api/users/alex/chat"))
            .json(&json!({ "message": "hello" }))
            .send()
            .await
            .unwrap();

        let body: Value = client
            .get(format!("{base}/api/users/alex/dashboard?hour=20"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["greeting"], "Good evening, Alex!");
        assert_eq!(body["bmi_status"], "Overweight");
        assert_eq!(body["weekly_points"], 2);
        assert_eq!(body["total_points"], 12);
    })
    .await
    .expect("test timed out");
}
