//! Serialized form of a quiz's question list.
//!
//! ```json
//! {"questions": [
//!   {"type": "multiple_choice", "question": "…", "options": ["a", "b"], "correct": [1]},
//!   {"type": "written", "question": "…", "options": [], "correct": "paris"}
//! ]}
//! ```

use serde::{Deserialize, Serialize};

use super::question::{AnswerKey, Question, QuestionError};

/// One question as authored or stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionDraft {
    /// Multiple-choice question; `correct` holds zero-based option indices.
    MultipleChoice {
        /// The question text.
        question: String,
        /// Option texts.
        options: Vec<String>,
        /// Indices of the correct options.
        correct: Vec<usize>,
    },
    /// Free-text question.
    Written {
        /// The question text.
        question: String,
        /// Unused; kept so stored documents round-trip unchanged.
        #[serde(default)]
        options: Vec<String>,
        /// The expected answer.
        correct: String,
    },
}

impl QuestionDraft {
    /// Validate the draft into a [`Question`].
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the draft violates a question invariant.
    pub fn into_question(self) -> Result<Question, QuestionError> {
        match self {
            Self::MultipleChoice {
                question,
                options,
                correct,
            } => Question::multiple_choice(question, options, correct),
            Self::Written {
                question, correct, ..
            } => Question::free_text(question, correct),
        }
    }
}

impl From<&Question> for QuestionDraft {
    fn from(question: &Question) -> Self {
        match question.key() {
            AnswerKey::Choices(correct) => Self::MultipleChoice {
                question: question.prompt().to_owned(),
                options: question.options().to_vec(),
                correct: correct.iter().copied().collect(),
            },
            AnswerKey::Text(expected) => Self::Written {
                question: question.prompt().to_owned(),
                options: Vec::new(),
                correct: expected.clone(),
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct QuizContent {
    #[serde(default)]
    questions: Vec<QuestionDraft>,
}

/// Why stored content could not be turned into questions.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("invalid quiz document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("question {ordinal}: {source}")]
    Question {
        ordinal: usize,
        #[source]
        source: QuestionError,
    },
}

/// Parse a stored question list.
///
/// # Errors
///
/// Returns `ContentError` if the document is not valid JSON of the expected
/// shape or any question fails validation.
pub fn parse_questions(content: &str) -> Result<Vec<Question>, ContentError> {
    let document: QuizContent = serde_json::from_str(content)?;
    document
        .questions
        .into_iter()
        .enumerate()
        .map(|(index, draft)| {
            draft.into_question().map_err(|source| ContentError::Question {
                ordinal: index + 1,
                source,
            })
        })
        .collect()
}

/// Serialize a question list for storage.
///
/// # Errors
///
/// Returns `serde_json::Error` if serialization fails.
pub fn encode_questions(questions: &[Question]) -> Result<String, serde_json::Error> {
    serde_json::to_string(&QuizContent {
        questions: questions.iter().map(QuestionDraft::from).collect(),
    })
}
