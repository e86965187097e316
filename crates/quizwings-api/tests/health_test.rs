//! Integration tests for the health endpoint.

mod common;

use axum::http::StatusCode;

#[tokio::test]
async fn test_health_returns_200_with_status_ok() {
    let state = common::test_state();

    let (status, json) = common::get_json(common::build_test_app(&state), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["live_sessions"], 0);
}

#[tokio::test]
async fn test_health_counts_enrolling_sessions() {
    let state = common::test_state();
    let quiz_id = common::create_capitals_quiz(&state, 1).await;
    common::post_json(
        common::build_test_app(&state),
        "/api/v1/sessions/join",
        &serde_json::json!({ "quiz_id": quiz_id, "participant_id": 100 }),
    )
    .await;

    let (_, json) = common::get_json(common::build_test_app(&state), "/health").await;

    assert_eq!(json["live_sessions"], 1);
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let app = common::build_test_app(&common::test_state());

    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/api/v1/nonexistent")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
