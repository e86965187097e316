//! Per-participant progress through a running quiz.

use chrono::{DateTime, Utc};
use quizwings_core::ids::UserId;
use quizwings_quiz::domain::question::Verdict;
use serde::Serialize;

/// Cursor and running score of one participant within one session.
///
/// `correct_count <= current_question_index <= total` holds after every
/// [`record`](Self::record); the index equals the question count exactly
/// when the participant has finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantProgress {
    participant_id: UserId,
    current_question_index: usize,
    correct_count: u32,
    last_activity: DateTime<Utc>,
}

impl ParticipantProgress {
    /// A fresh tracker positioned on the first question.
    #[must_use]
    pub fn new(participant_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            participant_id,
            current_question_index: 0,
            correct_count: 0,
            last_activity: now,
        }
    }

    #[must_use]
    pub fn participant_id(&self) -> UserId {
        self.participant_id
    }

    /// Zero-based index of the question the participant is on.
    #[must_use]
    pub fn current_question_index(&self) -> usize {
        self.current_question_index
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }

    /// Whether every one of `total` questions has been answered.
    #[must_use]
    pub fn is_finished(&self, total: usize) -> bool {
        self.current_question_index >= total
    }

    /// Records a graded answer to the current question and moves to the
    /// next one. A finished tracker is left untouched.
    pub fn record(&mut self, verdict: Verdict, total: usize, now: DateTime<Utc>) {
        if self.is_finished(total) {
            return;
        }
        if verdict.is_correct() {
            self.correct_count += 1;
        }
        self.current_question_index += 1;
        self.last_activity = now;
    }
}
