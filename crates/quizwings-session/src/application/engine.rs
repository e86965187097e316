//! Grading and advancement of individual answers.

use std::sync::Arc;

use quizwings_core::delivery::QuestionPrompt;
use quizwings_core::error::DomainError;
use quizwings_core::ids::UserId;
use quizwings_core::repository::ResultRecord;
use quizwings_quiz::domain::question::{Grade, Question, Verdict};
use quizwings_quiz::domain::quiz::QuizDefinition;
use tracing::{debug, error, info, instrument, warn};

use crate::application::collaborators::Collaborators;
use crate::domain::commands::SubmitAnswer;
use crate::domain::notifications;
use crate::domain::outcome::{AdvanceResult, IgnoreReason};
use crate::domain::registry::SessionRegistry;

// Everything the engine needs after the session lock is released.
struct Graded {
    quiz: Arc<QuizDefinition>,
    ordinal: usize,
    verdict: Verdict,
    submitted: String,
    correct_count: u32,
    next: Option<QuestionPrompt>,
}

/// Grades answers and moves participants through their quiz.
pub struct AdvancementEngine {
    registry: Arc<SessionRegistry>,
    collaborators: Collaborators,
}

impl AdvancementEngine {
    #[must_use]
    pub fn new(registry: Arc<SessionRegistry>, collaborators: Collaborators) -> Self {
        Self {
            registry,
            collaborators,
        }
    }

    /// Handles one answer.
    ///
    /// The answer is graded against the participant's current question and
    /// their tracker advanced in a single critical section; a second answer
    /// from the same participant sees the advanced tracker. Answers from
    /// participants who are not tracked, sessions that have not started, or
    /// submissions of the wrong kind are ignored without any side effect.
    ///
    /// The organizer hears about every graded answer. After the last
    /// question both sides get the final score and a result is persisted.
    ///
    /// # Errors
    ///
    /// Returns the result repository's error if the final result cannot be
    /// stored. The participant's tracker is gone by then.
    #[instrument(
        skip(self, command),
        fields(quiz_id = %command.quiz_id, participant_id = %command.participant_id)
    )]
    pub async fn handle_answer(&self, command: &SubmitAnswer) -> Result<AdvanceResult, DomainError> {
        let now = self.collaborators.clock.now();
        let graded = self.registry.with_running_tracker(
            command.quiz_id,
            command.participant_id,
            |quiz, tracker| {
                let index = tracker.current_question_index();
                let question = quiz.question(index).ok_or(IgnoreReason::NotTracked)?;
                let Grade::Graded(verdict) = question.grade(&command.submission) else {
                    return Err(IgnoreReason::KindMismatch);
                };
                tracker.record(verdict, quiz.len(), now);
                Ok(Graded {
                    quiz: Arc::clone(quiz),
                    ordinal: index + 1,
                    verdict,
                    submitted: question.describe_submission(&command.submission),
                    correct_count: tracker.correct_count(),
                    next: quiz
                        .question(tracker.current_question_index())
                        .map(Question::to_prompt),
                })
            },
        );
        let graded = match graded {
            Ok(graded) => graded,
            Err(reason) => {
                debug!(?reason, correlation_id = %command.correlation_id, "answer ignored");
                return Ok(AdvanceResult::ignored(reason));
            }
        };

        let label = self
            .collaborators
            .identities
            .display_label(command.participant_id)
            .await;
        let organizer = graded.quiz.owner_id();
        self.collaborators
            .notify(
                organizer,
                &notifications::answer_graded(
                    &label,
                    graded.ordinal,
                    graded.verdict,
                    &graded.submitted,
                ),
            )
            .await;

        match graded.next {
            Some(question) => {
                let next_ordinal = graded.ordinal + 1;
                self.dispatch(command.participant_id, &question, next_ordinal)
                    .await;
                Ok(AdvanceResult::Dispatch {
                    verdict: graded.verdict,
                    next_ordinal,
                    question,
                })
            }
            None => {
                let total_questions = u32::try_from(graded.quiz.len()).unwrap_or(u32::MAX);
                self.finalize(command, &label, organizer, graded, total_questions)
                    .await
            }
        }
    }

    async fn dispatch(&self, participant_id: UserId, question: &QuestionPrompt, ordinal: usize) {
        if let Err(error) = self
            .collaborators
            .delivery
            .send_question(participant_id, question, ordinal)
            .await
        {
            warn!(%participant_id, ordinal, %error, "question not delivered");
        }
    }

    async fn finalize(
        &self,
        command: &SubmitAnswer,
        label: &str,
        organizer: UserId,
        graded: Graded,
        total_questions: u32,
    ) -> Result<AdvanceResult, DomainError> {
        let correct_count = graded.correct_count;
        self.collaborators
            .notify(
                command.participant_id,
                &notifications::participant_finished(correct_count, total_questions),
            )
            .await;
        self.collaborators
            .notify(
                organizer,
                &notifications::organizer_finished(label, correct_count, total_questions),
            )
            .await;

        let result_id = self
            .persist_result(command, label, correct_count, total_questions)
            .await
            .inspect_err(|e| {
                error!(error = %e, correct_count, total_questions, "result not persisted");
            })?;

        info!(result_id, correct_count, total_questions, "participant finished");

        Ok(AdvanceResult::Finalize {
            verdict: graded.verdict,
            correct_count,
            total_questions,
            result_id,
        })
    }

    async fn persist_result(
        &self,
        command: &SubmitAnswer,
        label: &str,
        correct_count: u32,
        total_questions: u32,
    ) -> Result<i64, DomainError> {
        let results = &self.collaborators.results;
        let id = results.next_result_id().await?;
        results
            .save_result(&ResultRecord {
                id,
                participant_id: command.participant_id,
                participant_label: label.to_owned(),
                quiz_id: command.quiz_id,
                correct_count,
                total_questions,
                completed_at: self.collaborators.clock.now(),
            })
            .await?;
        Ok(id)
    }
}
