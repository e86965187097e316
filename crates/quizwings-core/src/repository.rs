//! Storage collaborator abstractions.
//!
//! Quiz content is persisted as an opaque JSON document; parsing it into a
//! typed definition is the quiz crate's job and happens once, at load time.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{QuizId, UserId};

/// Stored representation of a quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredQuiz {
    /// Quiz identifier.
    pub id: QuizId,
    /// Display name chosen by the organizer.
    pub name: String,
    /// The organizer who authored the quiz.
    pub owner_id: UserId,
    /// Serialized question list.
    pub content: String,
    /// True while a run is in progress.
    pub active: bool,
}

/// Final score of one participant in one completed quiz run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Result identifier.
    pub id: i64,
    /// The participant the result belongs to.
    pub participant_id: UserId,
    /// Display label of the participant at completion time.
    pub participant_label: String,
    /// The quiz that was taken.
    pub quiz_id: QuizId,
    /// Number of correctly answered questions.
    pub correct_count: u32,
    /// Number of questions in the quiz.
    pub total_questions: u32,
    /// When the participant answered the last question.
    pub completed_at: DateTime<Utc>,
}

/// Repository contract for quiz records.
#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// Load a quiz by id. Returns `Ok(None)` when it does not exist.
    async fn load_quiz(&self, quiz_id: QuizId) -> Result<Option<StoredQuiz>, DomainError>;

    /// Flip the `active` flag of a quiz.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::QuizNotFound` if the quiz does not exist.
    async fn set_active(&self, quiz_id: QuizId, active: bool) -> Result<(), DomainError>;

    /// The id a newly authored quiz should receive.
    async fn next_quiz_id(&self) -> Result<QuizId, DomainError>;

    /// Store a newly authored quiz. Returns `false` and writes nothing if
    /// its id is already taken, so concurrent authors never overwrite each
    /// other.
    async fn insert_quiz(&self, quiz: &StoredQuiz) -> Result<bool, DomainError>;

    /// Persist or replace a quiz.
    async fn save_quiz(&self, quiz: &StoredQuiz) -> Result<(), DomainError>;

    /// All quizzes authored by `owner_id`, ordered by id.
    async fn quizzes_by_owner(&self, owner_id: UserId) -> Result<Vec<StoredQuiz>, DomainError>;
}

/// Repository contract for participant results.
#[async_trait]
pub trait ResultRepository: Send + Sync {
    /// Reserve the id for the next result record.
    async fn next_result_id(&self) -> Result<i64, DomainError>;

    /// Persist a result record.
    async fn save_result(&self, result: &ResultRecord) -> Result<(), DomainError>;

    /// All results recorded for a quiz, ordered by result id.
    async fn results_for_quiz(&self, quiz_id: QuizId) -> Result<Vec<ResultRecord>, DomainError>;
}
