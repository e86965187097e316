//! Commands for quiz authoring.

use quizwings_core::command::Command;
use quizwings_core::ids::UserId;
use uuid::Uuid;

use super::content::QuestionDraft;

/// Command issued when an organizer finishes authoring a quiz.
#[derive(Debug, Clone)]
pub struct CreateQuiz {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The organizer who will own the quiz.
    pub owner_id: UserId,
    /// Display name of the quiz.
    pub name: String,
    /// Questions in delivery order.
    pub questions: Vec<QuestionDraft>,
}

impl Command for CreateQuiz {
    fn command_type(&self) -> &'static str {
        "quiz.create"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
