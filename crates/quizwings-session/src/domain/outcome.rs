//! Outcomes reported by the session engine and lifecycle controller.

use quizwings_core::delivery::QuestionPrompt;
use quizwings_core::ids::QuizId;
use quizwings_quiz::domain::question::Verdict;
use serde::Serialize;

/// Why an answer was dropped without touching any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// The participant has no tracker: never joined, already finished, or
    /// the quiz was stopped.
    NotTracked,
    /// The quiz is still enrolling.
    NotStarted,
    /// Text for a multiple-choice question, or choices for a free-text one.
    KindMismatch,
}

/// What happened to one answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AdvanceResult {
    /// Late, duplicate or mistyped answer. Nothing changed.
    Ignored { reason: IgnoreReason },
    /// Graded; the next question went to the participant.
    Dispatch {
        verdict: Verdict,
        /// 1-based ordinal of the question that was sent.
        next_ordinal: usize,
        question: QuestionPrompt,
    },
    /// Graded; that was the last question.
    Finalize {
        verdict: Verdict,
        correct_count: u32,
        total_questions: u32,
        /// Id of the persisted result record.
        result_id: i64,
    },
}

impl AdvanceResult {
    #[must_use]
    pub fn ignored(reason: IgnoreReason) -> Self {
        Self::Ignored { reason }
    }
}

/// Result of a join request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JoinOutcome {
    pub quiz_id: QuizId,
    /// `false` when the participant had already joined.
    pub newly_enrolled: bool,
}

/// Result of starting a quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StartReport {
    pub quiz_id: QuizId,
    /// Participants the run started with.
    pub participants: usize,
    /// Participants whose first question could not be delivered.
    pub failed_deliveries: usize,
}

/// Result of stopping a quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StopReport {
    pub quiz_id: QuizId,
    /// Trackers dropped without a recorded result.
    pub discarded: usize,
}
