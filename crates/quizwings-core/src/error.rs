//! Domain error types.
//!
//! The `Display` output of every variant is phrased for the person who
//! issued the command, so callers can relay it as-is.

use thiserror::Error;

use crate::ids::{QuizId, UserId};

/// Reasons a lifecycle command is rejected in the quiz's current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidState {
    /// The quiz is already running; it cannot be joined or started again.
    #[error("the quiz has already started")]
    AlreadyStarted,

    /// Nobody has joined the quiz yet.
    #[error("no participants have joined the quiz")]
    NoParticipants,

    /// The quiz has no questions to deliver.
    #[error("the quiz has no questions")]
    NoQuestions,
}

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The quiz does not exist.
    #[error("quiz {0} not found")]
    QuizNotFound(QuizId),

    /// The requester does not own the quiz.
    #[error("quiz {quiz_id} does not belong to user {requester}")]
    NotOwner {
        /// The quiz the command targeted.
        quiz_id: QuizId,
        /// The user who issued the command.
        requester: UserId,
    },

    /// The command is not legal in the quiz's current state.
    #[error("cannot proceed: {0}")]
    InvalidState(#[from] InvalidState),

    /// The stored question list of a quiz could not be parsed.
    #[error("quiz {quiz_id} has malformed content: {reason}")]
    MalformedQuizContent {
        /// The quiz whose content failed to parse.
        quiz_id: QuizId,
        /// What was wrong with it.
        reason: String,
    },

    /// A validation error in request input.
    #[error("validation error: {0}")]
    Validation(String),

    /// An infrastructure/persistence/delivery error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
