//! Lookup and ownership checks shared by organizer-only operations.

use quizwings_core::error::DomainError;
use quizwings_core::ids::{QuizId, UserId};
use quizwings_core::repository::{QuizRepository, StoredQuiz};

/// Load a quiz, treating absence as an error.
///
/// # Errors
///
/// Returns `DomainError::QuizNotFound` if the quiz does not exist, or the
/// repository's error.
pub async fn load_existing(
    quizzes: &dyn QuizRepository,
    quiz_id: QuizId,
) -> Result<StoredQuiz, DomainError> {
    quizzes
        .load_quiz(quiz_id)
        .await?
        .ok_or(DomainError::QuizNotFound(quiz_id))
}

/// Reject requests from anyone but the quiz's owner.
///
/// # Errors
///
/// Returns `DomainError::NotOwner` if `requester` is not the owner.
pub fn ensure_owner(quiz: &StoredQuiz, requester: UserId) -> Result<(), DomainError> {
    if quiz.owner_id == requester {
        Ok(())
    } else {
        Err(DomainError::NotOwner {
            quiz_id: quiz.id,
            requester,
        })
    }
}

/// Load a quiz and check that `requester` owns it.
///
/// # Errors
///
/// Returns `QuizNotFound` or `NotOwner`, or the repository's error.
pub async fn load_owned(
    quizzes: &dyn QuizRepository,
    quiz_id: QuizId,
    requester: UserId,
) -> Result<StoredQuiz, DomainError> {
    let quiz = load_existing(quizzes, quiz_id).await?;
    ensure_owner(&quiz, requester)?;
    Ok(quiz)
}
