//! The per-quiz session state machine.
//!
//! | state     | join      | start   | answer  | stop |
//! |-----------|-----------|---------|---------|------|
//! | Idle      | Enrolling | -       | -       | Idle |
//! | Enrolling | Enrolling | Running | -       | Idle |
//! | Running   | -         | -       | Running | Idle |
//!
//! `Idle` has no registry entry. Completed and stopped sessions go straight
//! back to `Idle` once the organizer stops them.

use std::sync::Arc;

use quizwings_quiz::domain::quiz::QuizDefinition;
use serde::Serialize;

/// Named states of a quiz session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Not in the registry; the quiz is not accepting or running anyone.
    Idle,
    /// Participants may join; answers are not accepted yet.
    Enrolling,
    /// Answers are accepted; nobody new may join.
    Running,
}

/// Events that drive a session between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Join,
    Start,
    Answer,
    Stop,
}

impl SessionState {
    /// The transition table. `None` means the event is illegal in this state.
    ///
    /// `Start` from `Idle` is illegal because nobody has enrolled yet.
    #[must_use]
    pub const fn on(self, event: SessionEvent) -> Option<Self> {
        match (self, event) {
            (Self::Idle | Self::Enrolling, SessionEvent::Join) => Some(Self::Enrolling),
            (Self::Enrolling, SessionEvent::Start) => Some(Self::Running),
            (Self::Running, SessionEvent::Answer) => Some(Self::Running),
            (_, SessionEvent::Stop) => Some(Self::Idle),
            (Self::Idle, SessionEvent::Start | SessionEvent::Answer)
            | (Self::Enrolling, SessionEvent::Answer)
            | (Self::Running, SessionEvent::Join | SessionEvent::Start) => None,
        }
    }

    /// Whether `event` is legal in this state.
    #[must_use]
    pub const fn accepts(self, event: SessionEvent) -> bool {
        self.on(event).is_some()
    }
}

/// Phase data carried by a registry entry. A running phase holds the parsed
/// quiz every answer is graded against; it never changes while running.
#[derive(Debug, Clone)]
pub enum SessionPhase {
    Enrolling,
    Running(Arc<QuizDefinition>),
}

impl SessionPhase {
    #[must_use]
    pub fn state(&self) -> SessionState {
        match self {
            Self::Enrolling => SessionState::Enrolling,
            Self::Running(_) => SessionState::Running,
        }
    }

    /// The quiz being run, if the session has started.
    #[must_use]
    pub fn quiz(&self) -> Option<&Arc<QuizDefinition>> {
        match self {
            Self::Enrolling => None,
            Self::Running(quiz) => Some(quiz),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_is_legal_only_before_start() {
        assert_eq!(SessionState::Idle.on(SessionEvent::Join), Some(SessionState::Enrolling));
        assert_eq!(
            SessionState::Enrolling.on(SessionEvent::Join),
            Some(SessionState::Enrolling)
        );
        assert!(!SessionState::Running.accepts(SessionEvent::Join));
    }

    #[test]
    fn test_start_requires_enrolling_session() {
        assert!(!SessionState::Idle.accepts(SessionEvent::Start));
        assert_eq!(
            SessionState::Enrolling.on(SessionEvent::Start),
            Some(SessionState::Running)
        );
        assert!(!SessionState::Running.accepts(SessionEvent::Start));
    }

    #[test]
    fn test_answers_are_accepted_only_while_running() {
        assert!(!SessionState::Idle.accepts(SessionEvent::Answer));
        assert!(!SessionState::Enrolling.accepts(SessionEvent::Answer));
        assert_eq!(
            SessionState::Running.on(SessionEvent::Answer),
            Some(SessionState::Running)
        );
    }

    #[test]
    fn test_stop_returns_every_state_to_idle() {
        for state in [SessionState::Idle, SessionState::Enrolling, SessionState::Running] {
            assert_eq!(state.on(SessionEvent::Stop), Some(SessionState::Idle));
        }
    }
}
