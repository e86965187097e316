//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use quizwings_core::clock::Clock;
use quizwings_core::repository::{QuizRepository, ResultRepository};
use quizwings_store::memory::{
    InMemoryIdentityDirectory, InMemoryQuizRepository, InMemoryResultRepository,
};
use quizwings_test_support::FixedClock;
use tower::ServiceExt;

use quizwings_api::routes;
use quizwings_api::state::AppState;

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock::new(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

/// Application state over the in-memory store.
pub fn test_state() -> AppState {
    state_with(
        Arc::new(InMemoryQuizRepository::new()),
        Arc::new(InMemoryResultRepository::new()),
    )
}

/// Application state over the given repositories with a fixed clock.
pub fn state_with(
    quizzes: Arc<dyn QuizRepository>,
    results: Arc<dyn ResultRepository>,
) -> AppState {
    AppState::new(
        quizzes,
        results,
        Arc::new(InMemoryIdentityDirectory::new()),
        fixed_clock(),
    )
}

/// Build the full app router around `state`. Uses the same route structure
/// as `main.rs`; sessions and the outbox live in the state, so routers built
/// from clones of one state see each other's effects.
pub fn build_test_app(state: &AppState) -> Router {
    routes::app(state.clone())
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Body of a two-question quiz: pick Paris from three cities, then type it.
pub fn capitals_quiz(owner_id: i64) -> serde_json::Value {
    serde_json::json!({
        "owner_id": owner_id,
        "name": "Capitals",
        "questions": [
            {
                "type": "multiple_choice",
                "question": "Which city is the capital of France?",
                "options": ["Lyon", "Paris", "Nice"],
                "correct": [1]
            },
            {
                "type": "written",
                "question": "Name the capital of France",
                "correct": "Paris"
            }
        ]
    })
}

/// Creates the capitals quiz and returns its id.
pub async fn create_capitals_quiz(state: &AppState, owner_id: i64) -> i64 {
    let (status, json) = post_json(
        build_test_app(state),
        "/api/v1/quizzes",
        &capitals_quiz(owner_id),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    json["quiz_id"].as_i64().unwrap()
}
