//! Routes for running quiz sessions.

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use quizwings_core::ids::{QuizId, UserId};
use quizwings_quiz::domain::question::Submission;
use quizwings_session::application::query_handlers::{self, SessionStatusView};
use quizwings_session::domain::commands;
use quizwings_session::domain::outcome::{
    AdvanceResult, IgnoreReason, JoinOutcome, StartReport, StopReport,
};
use serde::Deserialize;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /join.
#[derive(Debug, Deserialize)]
pub struct JoinRequest {
    pub quiz_id: QuizId,
    pub participant_id: UserId,
    /// Name shown to the organizer, e.g. "Ivan Petrov 5406".
    #[serde(default)]
    pub display_name: Option<String>,
    /// The participant's handle on the messaging platform.
    #[serde(default)]
    pub platform_name: Option<String>,
}

/// Request body for POST /start and POST /stop.
#[derive(Debug, Deserialize)]
pub struct OrganizerRequest {
    pub quiz_id: QuizId,
    pub requester_id: UserId,
}

/// Request body for POST /answer.
#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    /// Resolved from the participant's running quiz when absent.
    #[serde(default)]
    pub quiz_id: Option<QuizId>,
    pub participant_id: UserId,
    pub answer: Submission,
}

/// Query string for GET /{quiz_id}.
#[derive(Debug, Deserialize)]
pub struct RequesterQuery {
    pub requester_id: UserId,
}

/// POST /join
#[instrument(skip(state, request), fields(quiz_id = %request.quiz_id, participant_id = %request.participant_id))]
async fn join(
    State(state): State<AppState>,
    Json(request): Json<JoinRequest>,
) -> Result<Json<JoinOutcome>, ApiError> {
    let command = commands::JoinQuiz {
        correlation_id: Uuid::new_v4(),
        quiz_id: request.quiz_id,
        participant_id: request.participant_id,
        display_name: request.display_name,
        platform_name: request.platform_name,
    };

    info!(correlation_id = %command.correlation_id, "handling join command");

    Ok(Json(state.lifecycle.join(&command).await?))
}

/// POST /start
#[instrument(skip(state, request), fields(quiz_id = %request.quiz_id, requester_id = %request.requester_id))]
async fn start(
    State(state): State<AppState>,
    Json(request): Json<OrganizerRequest>,
) -> Result<Json<StartReport>, ApiError> {
    let command = commands::StartQuiz {
        correlation_id: Uuid::new_v4(),
        quiz_id: request.quiz_id,
        requester_id: request.requester_id,
    };

    info!(correlation_id = %command.correlation_id, "handling start command");

    Ok(Json(state.lifecycle.start(&command).await?))
}

/// POST /stop
#[instrument(skip(state, request), fields(quiz_id = %request.quiz_id, requester_id = %request.requester_id))]
async fn stop(
    State(state): State<AppState>,
    Json(request): Json<OrganizerRequest>,
) -> Result<Json<StopReport>, ApiError> {
    let command = commands::StopQuiz {
        correlation_id: Uuid::new_v4(),
        quiz_id: request.quiz_id,
        requester_id: request.requester_id,
    };

    info!(correlation_id = %command.correlation_id, "handling stop command");

    Ok(Json(state.lifecycle.stop(&command).await?))
}

/// POST /answer
#[instrument(skip(state, request), fields(participant_id = %request.participant_id))]
async fn answer(
    State(state): State<AppState>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<AdvanceResult>, ApiError> {
    let quiz_id = request
        .quiz_id
        .or_else(|| state.registry.quiz_of_participant(request.participant_id));
    let Some(quiz_id) = quiz_id else {
        debug!("answer from participant without a running quiz ignored");
        return Ok(Json(AdvanceResult::ignored(IgnoreReason::NotTracked)));
    };

    let command = commands::SubmitAnswer {
        correlation_id: Uuid::new_v4(),
        quiz_id,
        participant_id: request.participant_id,
        submission: request.answer,
    };

    info!(correlation_id = %command.correlation_id, %quiz_id, "handling answer command");

    Ok(Json(state.engine.handle_answer(&command).await?))
}

/// GET /{quiz_id}?requester_id=
async fn session_status(
    State(state): State<AppState>,
    Path(quiz_id): Path<QuizId>,
    Query(query): Query<RequesterQuery>,
) -> Result<Json<SessionStatusView>, ApiError> {
    let view = query_handlers::get_session_status(
        quiz_id,
        query.requester_id,
        &*state.quizzes,
        &*state.identities,
        &state.registry,
    )
    .await?;
    Ok(Json(view))
}

/// Returns the router for session lifecycle and answers.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/join", post(join))
        .route("/start", post(start))
        .route("/stop", post(stop))
        .route("/answer", post(answer))
        .route("/{quiz_id}", get(session_status))
}
