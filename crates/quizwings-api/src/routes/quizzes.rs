//! Routes for quiz authoring and organizer views.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use quizwings_core::ids::{QuizId, UserId};
use quizwings_quiz::application::command_handlers;
use quizwings_quiz::application::query_handlers::{self, QuizStatsView, QuizSummaryView};
use quizwings_quiz::domain::commands;
use quizwings_quiz::domain::content::QuestionDraft;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct CreateQuizRequest {
    /// The organizer who will own the quiz.
    pub owner_id: UserId,
    pub name: String,
    pub questions: Vec<QuestionDraft>,
}

/// Response body for a created quiz.
#[derive(Debug, Serialize)]
pub struct CreatedQuizResponse {
    pub quiz_id: QuizId,
    pub question_count: usize,
}

/// Query string for GET /.
#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub owner_id: UserId,
}

/// Query string for GET /{quiz_id}/results.
#[derive(Debug, Deserialize)]
pub struct RequesterQuery {
    pub requester_id: UserId,
}

/// POST /
#[instrument(skip(state, request), fields(owner_id = %request.owner_id))]
async fn create_quiz(
    State(state): State<AppState>,
    Json(request): Json<CreateQuizRequest>,
) -> Result<(StatusCode, Json<CreatedQuizResponse>), ApiError> {
    let command = commands::CreateQuiz {
        correlation_id: Uuid::new_v4(),
        owner_id: request.owner_id,
        name: request.name,
        questions: request.questions,
    };

    info!(correlation_id = %command.correlation_id, "handling create_quiz command");

    let created = command_handlers::handle_create_quiz(&command, &*state.quizzes).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedQuizResponse {
            quiz_id: created.quiz_id,
            question_count: created.question_count,
        }),
    ))
}

/// GET /?owner_id=
async fn list_quizzes(
    State(state): State<AppState>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<Vec<QuizSummaryView>>, ApiError> {
    let views = query_handlers::list_quizzes_by_owner(query.owner_id, &*state.quizzes).await?;
    Ok(Json(views))
}

/// GET /{quiz_id}/results?requester_id=
async fn quiz_results(
    State(state): State<AppState>,
    Path(quiz_id): Path<QuizId>,
    Query(query): Query<RequesterQuery>,
) -> Result<Json<QuizStatsView>, ApiError> {
    let stats = query_handlers::get_quiz_stats(
        quiz_id,
        query.requester_id,
        &*state.quizzes,
        &*state.results,
    )
    .await?;
    Ok(Json(stats))
}

/// Returns the router for quiz authoring.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_quiz).get(list_quizzes))
        .route("/{quiz_id}/results", get(quiz_results))
}
