// tests/rest_api.rs

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use spacedash_client::api::SubmitError;
use spacedash_client::api_client::{ApiClient, StaticToken};
use spacedash_client::articles::{ArticleFeed, TRENDING_CACHE_KEY};
use spacedash_client::cache::TtlCache;
use spacedash_client::storage::{MemoryStorage, Storage};
use spacedash_shared::{ApiError, Article, GradingError, Question, QuestionSet, Role};

type Hits = Arc<AtomicUsize>;

/// Serve `app` on a random port. Returns the base URL.
async fn spawn_app(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://127.0.0.1:{}", port)
}

fn client(address: &str, token: Option<&str>) -> ApiClient {
    ApiClient::new(address, Arc::new(StaticToken(token.map(str::to_string))))
}

async fn count_and_list_spaces(State(hits): State<Hits>) -> Json<Value> {
    hits.fetch_add(1, Ordering::SeqCst);
    Json(json!({ "Spaces": [{ "Id": "s1", "Name": "Physics" }] }))
}

#[tokio::test]
async fn missing_or_null_lists_are_empty() {
    // Arrange
    let app = Router::new()
        .route("/spaces", get(|| async { Json(json!({})) }))
        .route("/spaces/s1/files", get(|| async { Json(json!({ "Files": null })) }))
        .route(
            "/users",
            get(|| async {
                Json(json!({
                    "Users": [{ "Username": "ada", "Email": "ada@example.com", "Role": "SystemAdmin" }]
                }))
            }),
        );
    let address = spawn_app(app).await;
    let api = client(&address, Some("token"));

    // Act
    let spaces = api.list_spaces().await.expect("spaces");
    let files = api.list_files("s1").await.expect("files");
    let users = api.list_users().await.expect("users");

    // Assert
    assert!(spaces.is_empty());
    assert!(files.is_empty());
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].role, Some(Role::SystemAdmin));
}

#[tokio::test]
async fn requests_carry_the_bearer_token() {
    let app = Router::new().route(
        "/spaces",
        get(|headers: HeaderMap| async move {
            match headers.get("authorization").and_then(|v| v.to_str().ok()) {
                Some("Bearer secret-token") => (StatusCode::OK, Json(json!({ "Spaces": [] }))),
                _ => (StatusCode::UNAUTHORIZED, Json(json!({ "message": "no token" }))),
            }
        }),
    );
    let address = spawn_app(app).await;

    assert!(client(&address, Some("secret-token")).list_spaces().await.is_ok());
}

#[tokio::test]
async fn unauthenticated_calls_never_reach_the_server() {
    // Arrange
    let hits = Hits::default();
    let app = Router::new()
        .route("/spaces", get(count_and_list_spaces))
        .with_state(hits.clone());
    let address = spawn_app(app).await;

    // Act
    let result = client(&address, None).list_spaces().await;

    // Assert
    assert!(matches!(result, Err(ApiError::Unauthenticated)));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn server_errors_keep_status_and_body() {
    let app = Router::new().route(
        "/spaces",
        get(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "database unavailable" })),
            )
        }),
    );
    let address = spawn_app(app).await;

    let err = client(&address, Some("token"))
        .list_spaces()
        .await
        .expect_err("500 must fail");

    match &err {
        ApiError::Http { status, body, .. } => {
            assert_eq!(*status, 500);
            assert!(body.contains("database unavailable"));
        }
        other => panic!("Expected Http error, got {other:?}"),
    }
    assert_eq!(err.user_message(), "database unavailable");
}

fn question(sequence_number: u32) -> Question {
    Question {
        sequence_number,
        question: format!("Question {sequence_number}"),
        option_a: "one".to_string(),
        option_b: "two".to_string(),
        option_c: "three".to_string(),
        option_d: "four".to_string(),
    }
}

fn question_set() -> QuestionSet {
    QuestionSet {
        id: "set-1".to_string(),
        user_id: "ada".to_string(),
        space_id: "s1".to_string(),
        created_at: None,
        // Deliberately out of order; answers follow sequence numbers.
        questions: vec![question(3), question(1), question(2)],
    }
}

async fn answer_key(State(hits): State<Hits>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    hits.fetch_add(1, Ordering::SeqCst);
    let answers = body["Answers"].as_array().map(Vec::len).unwrap_or(0);
    if answers != 3 {
        return (StatusCode::BAD_REQUEST, Json(json!({ "message": "wrong answer count" })));
    }
    (
        StatusCode::OK,
        Json(json!({
            "Results": [
                { "SequenceNumber": 2, "Answer": "B", "Explanation": "Two is B" },
                { "SequenceNumber": 1, "Answer": "A", "Explanation": "One is A" },
                { "SequenceNumber": 3, "Answer": "D", "Explanation": "Three is D" }
            ]
        })),
    )
}

#[tokio::test]
async fn submit_and_grade_scores_every_question() {
    // Arrange
    let hits = Hits::default();
    let app = Router::new()
        .route("/spaces/s1/questions/set-1/submit", post(answer_key))
        .with_state(hits.clone());
    let address = spawn_app(app).await;
    let answers = vec!["a".to_string(), "C".to_string(), "D".to_string()];

    // Act
    let score = client(&address, Some("token"))
        .submit_and_grade(&question_set(), answers)
        .await
        .expect("graded");

    // Assert
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(score.total, 3);
    assert_eq!(score.graded.len(), 3);
    assert_eq!(score.correct, 2);
    assert_eq!(score.percent, 67);

    let second = &score.graded[1];
    assert_eq!(second.sequence_number, 2);
    assert_eq!(second.given, "C");
    assert_eq!(second.expected, "B");
    assert!(!second.correct);
    assert_eq!(second.explanation, "Two is B");
}

#[tokio::test]
async fn misaligned_answers_are_rejected_before_sending() {
    let hits = Hits::default();
    let app = Router::new()
        .route("/spaces/s1/questions/set-1/submit", post(answer_key))
        .with_state(hits.clone());
    let address = spawn_app(app).await;

    let result = client(&address, Some("token"))
        .submit_and_grade(&question_set(), vec!["A".to_string()])
        .await;

    assert!(matches!(
        result,
        Err(SubmitError::Grading(GradingError::Misaligned {
            questions: 3,
            answers: 1
        }))
    ));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

async fn trending(State(hits): State<Hits>) -> Json<Value> {
    hits.fetch_add(1, Ordering::SeqCst);
    Json(json!([
        { "id": 7, "title": "Rust on the web", "url": "https://dev.to/rust-web", "user": { "name": "Ferris" } }
    ]))
}

fn feed(address: &str, storage: Arc<dyn Storage>) -> ArticleFeed {
    ArticleFeed::new(
        client(address, None),
        TtlCache::new(storage, "articles"),
        format!("{address}/articles"),
    )
}

#[tokio::test]
async fn fresh_articles_are_served_from_cache() {
    // Arrange
    let hits = Hits::default();
    let app = Router::new()
        .route("/articles", get(trending))
        .with_state(hits.clone());
    let address = spawn_app(app).await;
    let feed = feed(&address, Arc::new(MemoryStorage::new()));

    // Act
    let first = feed.trending().await.expect("first fetch");
    let second = feed.trending().await.expect("cached fetch");

    // Assert
    assert_eq!(first, second);
    assert_eq!(first[0].user.name, "Ferris");
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    feed.invalidate();
    feed.trending().await.expect("refetch");
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn expired_articles_are_refetched() {
    // Arrange: an entry that expired an hour ago
    let hits = Hits::default();
    let app = Router::new()
        .route("/articles", get(trending))
        .with_state(hits.clone());
    let address = spawn_app(app).await;
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    let stale = vec![Article {
        id: 1,
        title: "Old news".to_string(),
        url: "https://dev.to/old".to_string(),
        description: None,
        user: Default::default(),
        positive_reactions_count: 0,
    }];
    TtlCache::new(storage.clone(), "articles").put_at(
        TRENDING_CACHE_KEY,
        &stale,
        Duration::minutes(30),
        Utc::now() - Duration::minutes(90),
    );

    // Act
    let articles = feed(&address, storage).trending().await.expect("fetch");

    // Assert
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(articles[0].title, "Rust on the web");
}
