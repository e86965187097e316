//! Query handlers for organizer-facing quiz views.

use chrono::{DateTime, Utc};
use quizwings_core::error::DomainError;
use quizwings_core::ids::{QuizId, UserId};
use quizwings_core::repository::{QuizRepository, ResultRecord, ResultRepository};
use serde::Serialize;

use crate::application::access::load_owned;
use crate::domain::content::parse_questions;

/// Read-only summary of one of an organizer's quizzes.
#[derive(Debug, Clone, Serialize)]
pub struct QuizSummaryView {
    /// The quiz identifier.
    pub quiz_id: QuizId,
    /// Display name.
    pub name: String,
    /// Whether a run is in progress.
    pub active: bool,
    /// Number of questions, or `None` when the stored content is malformed.
    pub question_count: Option<usize>,
}

/// One participant's final score.
#[derive(Debug, Clone, Serialize)]
pub struct ResultView {
    /// The participant.
    pub participant_id: UserId,
    /// Their display label when they finished.
    pub participant_label: String,
    /// Correctly answered questions.
    pub correct_count: u32,
    /// Questions in the quiz.
    pub total_questions: u32,
    /// When they answered the last question.
    pub completed_at: DateTime<Utc>,
}

impl From<ResultRecord> for ResultView {
    fn from(record: ResultRecord) -> Self {
        Self {
            participant_id: record.participant_id,
            participant_label: record.participant_label,
            correct_count: record.correct_count,
            total_questions: record.total_questions,
            completed_at: record.completed_at,
        }
    }
}

/// Results of a quiz, grouped by the group number in participants' names.
#[derive(Debug, Clone, Serialize)]
pub struct QuizStatsView {
    /// The quiz identifier.
    pub quiz_id: QuizId,
    /// Display name.
    pub name: String,
    /// One entry per finished participant. Ordered by group number; labels
    /// without one come last, and ties keep the order participants finished.
    pub results: Vec<ResultView>,
}

/// Lists the quizzes authored by `owner_id`, ordered by id.
///
/// # Errors
///
/// Returns the repository's error.
pub async fn list_quizzes_by_owner(
    owner_id: UserId,
    quizzes: &dyn QuizRepository,
) -> Result<Vec<QuizSummaryView>, DomainError> {
    let stored = quizzes.quizzes_by_owner(owner_id).await?;
    Ok(stored
        .into_iter()
        .map(|quiz| QuizSummaryView {
            question_count: parse_questions(&quiz.content).ok().map(|q| q.len()),
            quiz_id: quiz.id,
            name: quiz.name,
            active: quiz.active,
        })
        .collect())
}

/// Retrieves the recorded results of a quiz. Only the owner may see them.
///
/// # Errors
///
/// Returns `DomainError::QuizNotFound` or `DomainError::NotOwner`, or the
/// repository's error.
pub async fn get_quiz_stats(
    quiz_id: QuizId,
    requester: UserId,
    quizzes: &dyn QuizRepository,
    results: &dyn ResultRepository,
) -> Result<QuizStatsView, DomainError> {
    let quiz = load_owned(quizzes, quiz_id, requester).await?;
    let records = results.results_for_quiz(quiz_id).await?;
    let mut views: Vec<ResultView> = records.into_iter().map(ResultView::from).collect();
    views.sort_by_key(|view| {
        let group = group_number(&view.participant_label);
        (group.is_none(), group)
    });
    Ok(QuizStatsView {
        quiz_id,
        name: quiz.name,
        results: views,
    })
}

/// The last all-digit word of a label, e.g. 5406 in
/// "Ivan Petrov 5406 (ivan)".
fn group_number(label: &str) -> Option<u64> {
    label
        .split_whitespace()
        .rev()
        .find_map(|word| word.parse().ok())
}
