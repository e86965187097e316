//! Joining, starting and stopping quizzes.

use std::sync::Arc;

use chrono::Duration;
use quizwings_core::error::{DomainError, InvalidState};
use quizwings_core::ids::{QuizId, UserId};
use quizwings_quiz::application::access::{load_existing, load_owned};
use quizwings_quiz::domain::question::Question;
use quizwings_quiz::domain::quiz::QuizDefinition;
use tracing::{error, info, instrument, warn};

use crate::application::collaborators::Collaborators;
use crate::domain::commands::{JoinQuiz, StartQuiz, StopQuiz};
use crate::domain::notifications;
use crate::domain::outcome::{JoinOutcome, StartReport, StopReport};
use crate::domain::registry::SessionRegistry;

/// Drives quizzes through enrolling, running and back to idle.
pub struct LifecycleController {
    registry: Arc<SessionRegistry>,
    collaborators: Collaborators,
}

impl LifecycleController {
    #[must_use]
    pub fn new(registry: Arc<SessionRegistry>, collaborators: Collaborators) -> Self {
        Self {
            registry,
            collaborators,
        }
    }

    /// Enrolls a participant in a quiz that has not started. Joining twice
    /// is harmless. A display name, when given, becomes the participant's
    /// friendly name.
    ///
    /// # Errors
    ///
    /// `QuizNotFound`, `InvalidState::AlreadyStarted` if the quiz is active,
    /// `Validation` for a blank display name, or a repository error.
    #[instrument(
        skip(self, command),
        fields(quiz_id = %command.quiz_id, participant_id = %command.participant_id)
    )]
    pub async fn join(&self, command: &JoinQuiz) -> Result<JoinOutcome, DomainError> {
        if command
            .display_name
            .as_deref()
            .is_some_and(|name| name.trim().is_empty())
        {
            return Err(DomainError::Validation(
                "display name must not be empty".into(),
            ));
        }

        let quiz = load_existing(&*self.collaborators.quizzes, command.quiz_id).await?;
        if quiz.active {
            return Err(InvalidState::AlreadyStarted.into());
        }

        let newly_enrolled = self.registry.enroll(
            command.quiz_id,
            command.participant_id,
            self.collaborators.clock.now(),
        )?;

        let identities = &self.collaborators.identities;
        if let Some(name) = &command.platform_name {
            identities
                .set_platform_name(command.participant_id, name.clone())
                .await?;
        }
        if let Some(name) = &command.display_name {
            identities
                .set_friendly_name(command.participant_id, name.clone())
                .await?;
        }

        if newly_enrolled {
            info!(correlation_id = %command.correlation_id, "participant enrolled");
            let label = identities.display_label(command.participant_id).await;
            self.collaborators
                .notify(
                    command.participant_id,
                    &notifications::joined(&label, &quiz.name),
                )
                .await;
        }

        Ok(JoinOutcome {
            quiz_id: command.quiz_id,
            newly_enrolled,
        })
    }

    /// Starts a quiz: marks it active and sends question 1 to every
    /// enrolled participant in enrollment order.
    ///
    /// The session stops accepting enrollments before anything is
    /// persisted or sent, so a late join is either in the roster or
    /// rejected. A participant whose first question cannot be delivered
    /// stays enrolled and is counted in the report. A concurrent `stop` of
    /// the same quiz waits until the start has finished.
    ///
    /// # Errors
    ///
    /// `QuizNotFound`, `NotOwner`, `InvalidState::AlreadyStarted`,
    /// `MalformedQuizContent`, `InvalidState::NoParticipants`,
    /// `InvalidState::NoQuestions`, or the repository's error (in which case
    /// the session is back to enrolling).
    #[instrument(
        skip(self, command),
        fields(quiz_id = %command.quiz_id, requester_id = %command.requester_id)
    )]
    pub async fn start(&self, command: &StartQuiz) -> Result<StartReport, DomainError> {
        let _gate = self.registry.lifecycle_gate(command.quiz_id).await;
        let quizzes = &self.collaborators.quizzes;
        let stored = load_owned(&**quizzes, command.quiz_id, command.requester_id).await?;
        if stored.active {
            return Err(InvalidState::AlreadyStarted.into());
        }
        let quiz = Arc::new(QuizDefinition::from_stored(&stored)?);

        let roster = self.registry.begin(command.quiz_id, Arc::clone(&quiz))?;

        if let Err(e) = quizzes.set_active(command.quiz_id, true).await {
            self.registry.revert_to_enrolling(command.quiz_id);
            error!(error = %e, "could not mark quiz active; start rolled back");
            return Err(e);
        }

        info!(
            correlation_id = %command.correlation_id,
            participants = roster.len(),
            questions = quiz.len(),
            "quiz started"
        );

        let mut failed_deliveries = 0;
        if let Some(first) = quiz.question(0).map(Question::to_prompt) {
            for participant_id in &roster {
                if let Err(e) = self
                    .collaborators
                    .delivery
                    .send_question(*participant_id, &first, 1)
                    .await
                {
                    warn!(%participant_id, error = %e, "first question not delivered");
                    failed_deliveries += 1;
                }
            }
        }

        Ok(StartReport {
            quiz_id: command.quiz_id,
            participants: roster.len(),
            failed_deliveries,
        })
    }

    /// Stops a quiz: marks it inactive and drops every tracker without
    /// recording results. The session is removed even if persisting the
    /// flag fails, so the quiz can always be stopped again. Waits for an
    /// in-flight `start` of the same quiz to finish first.
    ///
    /// # Errors
    ///
    /// `QuizNotFound`, `NotOwner`, or the repository's error.
    #[instrument(
        skip(self, command),
        fields(quiz_id = %command.quiz_id, requester_id = %command.requester_id)
    )]
    pub async fn stop(&self, command: &StopQuiz) -> Result<StopReport, DomainError> {
        let _gate = self.registry.lifecycle_gate(command.quiz_id).await;
        let quizzes = &self.collaborators.quizzes;
        load_owned(&**quizzes, command.quiz_id, command.requester_id).await?;

        let persisted = quizzes.set_active(command.quiz_id, false).await;
        let discarded = self.registry.remove(command.quiz_id);
        persisted?;

        info!(correlation_id = %command.correlation_id, discarded, "quiz stopped");

        Ok(StopReport {
            quiz_id: command.quiz_id,
            discarded,
        })
    }

    /// Drops participants who have not answered for longer than
    /// `max_idle`. Their results are not recorded.
    pub fn evict_idle(&self, max_idle: Duration) -> Vec<(QuizId, UserId)> {
        let evicted = self
            .registry
            .evict_idle(self.collaborators.clock.now(), max_idle);
        for (quiz_id, participant_id) in &evicted {
            warn!(%quiz_id, %participant_id, "idle participant evicted");
        }
        evicted
    }
}
