//! Command handlers for quiz authoring.

use quizwings_core::command::Command;
use quizwings_core::error::DomainError;
use quizwings_core::ids::QuizId;
use quizwings_core::repository::{QuizRepository, StoredQuiz};
use tracing::{debug, info, instrument};

use crate::domain::commands::CreateQuiz;
use crate::domain::content::encode_questions;
use crate::domain::question::Question;

/// How many fresh ids creation tries before giving up when other authors
/// keep claiming them first.
const MAX_ID_ATTEMPTS: usize = 5;

/// Result of a successfully authored quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedQuiz {
    /// The id assigned to the new quiz.
    pub quiz_id: QuizId,
    /// Number of questions stored.
    pub question_count: usize,
}

/// Handles the `CreateQuiz` command: validates every question, assigns the
/// next quiz id and persists the quiz as inactive.
///
/// The quiz is inserted, never upserted. If a concurrent author claims the
/// same id first, a fresh id is drawn.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the name is blank, there are no
/// questions, or a question is invalid; `DomainError::Infrastructure` if no
/// free id was found; otherwise the repository's error.
#[instrument(skip(command, quizzes), fields(owner_id = %command.owner_id, command = command.command_type()))]
pub async fn handle_create_quiz(
    command: &CreateQuiz,
    quizzes: &dyn QuizRepository,
) -> Result<CreatedQuiz, DomainError> {
    let name = command.name.trim();
    if name.is_empty() {
        return Err(DomainError::Validation("quiz name must not be empty".into()));
    }
    if command.questions.is_empty() {
        return Err(DomainError::Validation(
            "a quiz needs at least one question".into(),
        ));
    }

    let questions = command
        .questions
        .iter()
        .cloned()
        .enumerate()
        .map(|(index, draft)| {
            draft
                .into_question()
                .map_err(|e| DomainError::Validation(format!("question {}: {e}", index + 1)))
        })
        .collect::<Result<Vec<Question>, _>>()?;

    let content = encode_questions(&questions)
        .map_err(|e| DomainError::Infrastructure(format!("quiz serialization failed: {e}")))?;

    let mut quiz = StoredQuiz {
        id: QuizId::new(0),
        name: name.to_owned(),
        owner_id: command.owner_id,
        content,
        active: false,
    };
    for _ in 0..MAX_ID_ATTEMPTS {
        quiz.id = quizzes.next_quiz_id().await?;
        if quizzes.insert_quiz(&quiz).await? {
            info!(quiz_id = %quiz.id, correlation_id = %command.correlation_id, "quiz created");
            return Ok(CreatedQuiz {
                quiz_id: quiz.id,
                question_count: questions.len(),
            });
        }
        debug!(quiz_id = %quiz.id, "quiz id taken concurrently, drawing another");
    }

    Err(DomainError::Infrastructure(format!(
        "no free quiz id after {MAX_ID_ATTEMPTS} attempts"
    )))
}
