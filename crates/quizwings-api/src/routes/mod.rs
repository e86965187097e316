//! Route modules organized by boundary concern.

pub mod health;
pub mod inbox;
pub mod quizzes;
pub mod sessions;

use axum::Router;

use crate::state::AppState;

/// Builds the full application router. Shared by `main.rs` and the
/// integration tests so both serve the same route structure.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .nest("/api/v1/quizzes", quizzes::router())
        .nest("/api/v1/sessions", sessions::router())
        .nest("/api/v1/inbox", inbox::router())
        .with_state(state)
}
