//! Pickup of messages delivered to a user.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use quizwings_core::ids::UserId;
use tracing::debug;

use crate::outbox::OutboxMessage;
use crate::state::AppState;

/// GET /{user_id}
///
/// Returns and forgets every message waiting for the user, oldest first.
async fn drain_inbox(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Json<Vec<OutboxMessage>> {
    let messages = state.outbox.drain(user_id);
    debug!(%user_id, count = messages.len(), "inbox drained");
    Json(messages)
}

pub fn router() -> Router<AppState> {
    Router::new().route("/{user_id}", get(drain_inbox))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::Utc;
    use quizwings_core::delivery::Delivery;
    use quizwings_store::memory::{
        InMemoryIdentityDirectory, InMemoryQuizRepository, InMemoryResultRepository,
    };
    use quizwings_test_support::FixedClock;
    use serde_json::Value;
    use tower::ServiceExt;

    fn test_app_state() -> AppState {
        AppState::new(
            Arc::new(InMemoryQuizRepository::new()),
            Arc::new(InMemoryResultRepository::new()),
            Arc::new(InMemoryIdentityDirectory::new()),
            Arc::new(FixedClock::new(Utc::now())),
        )
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_drain_inbox_returns_pending_messages_once() {
        // Arrange
        let state = test_app_state();
        state
            .outbox
            .send_text(UserId::new(100), "hello")
            .await
            .unwrap();

        // Act
        let first = router()
            .with_state(state.clone())
            .oneshot(get_request("/100"))
            .await
            .unwrap();
        let second = router()
            .with_state(state)
            .oneshot(get_request("/100"))
            .await
            .unwrap();

        // Assert
        assert_eq!(first.status(), StatusCode::OK);
        let body_bytes = axum::body::to_bytes(first.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(json, serde_json::json!([{ "type": "text", "text": "hello" }]));

        let body_bytes = axum::body::to_bytes(second.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(json, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_drain_inbox_rejects_non_numeric_user() {
        let app = router().with_state(test_app_state());

        let response = app.oneshot(get_request("/alice")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
