//! Quiz definitions: an ordered question list plus identity and ownership.

use quizwings_core::error::DomainError;
use quizwings_core::ids::{QuizId, UserId};
use quizwings_core::repository::StoredQuiz;

use super::content::parse_questions;
use super::question::Question;

/// A validated quiz, ready to be run. Question order is delivery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizDefinition {
    id: QuizId,
    name: String,
    owner_id: UserId,
    questions: Vec<Question>,
}

impl QuizDefinition {
    #[must_use]
    pub fn new(id: QuizId, name: String, owner_id: UserId, questions: Vec<Question>) -> Self {
        Self {
            id,
            name,
            owner_id,
            questions,
        }
    }

    /// Parse and validate a stored quiz.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MalformedQuizContent` if the question list
    /// cannot be parsed.
    pub fn from_stored(stored: &StoredQuiz) -> Result<Self, DomainError> {
        let questions =
            parse_questions(&stored.content).map_err(|e| DomainError::MalformedQuizContent {
                quiz_id: stored.id,
                reason: e.to_string(),
            })?;
        Ok(Self::new(
            stored.id,
            stored.name.clone(),
            stored.owner_id,
            questions,
        ))
    }

    #[must_use]
    pub fn id(&self) -> QuizId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn owner_id(&self) -> UserId {
        self.owner_id
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// The question at a zero-based index.
    #[must_use]
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Number of questions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}
