//! Organizer-facing view of a live session.

use chrono::{DateTime, Utc};
use quizwings_core::error::DomainError;
use quizwings_core::identity::IdentityDirectory;
use quizwings_core::ids::{QuizId, UserId};
use quizwings_core::repository::QuizRepository;
use quizwings_quiz::application::access::load_owned;
use serde::Serialize;

use crate::domain::phase::SessionState;
use crate::domain::registry::SessionRegistry;

#[derive(Debug, Clone, Serialize)]
pub struct ParticipantStatusView {
    pub participant_id: UserId,
    pub participant_label: String,
    /// 1-based number of the question the participant is on.
    pub current_question: usize,
    pub correct_count: u32,
    pub last_activity: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionStatusView {
    pub quiz_id: QuizId,
    pub state: SessionState,
    pub participants: Vec<ParticipantStatusView>,
}

/// Returns the session state of an owned quiz and its participants in
/// enrollment order.
///
/// # Errors
///
/// `QuizNotFound`, `NotOwner`, or the repository's error.
pub async fn get_session_status(
    quiz_id: QuizId,
    requester: UserId,
    quizzes: &dyn QuizRepository,
    identities: &dyn IdentityDirectory,
    registry: &SessionRegistry,
) -> Result<SessionStatusView, DomainError> {
    load_owned(quizzes, quiz_id, requester).await?;

    let state = registry.state(quiz_id);
    let mut participants = Vec::new();
    for progress in registry.participants_of(quiz_id) {
        participants.push(ParticipantStatusView {
            participant_id: progress.participant_id(),
            participant_label: identities.display_label(progress.participant_id()).await,
            current_question: progress.current_question_index() + 1,
            correct_count: progress.correct_count(),
            last_activity: progress.last_activity(),
        });
    }

    Ok(SessionStatusView {
        quiz_id,
        state,
        participants,
    })
}
