//! Commands for the session lifecycle and answer handling.

use quizwings_core::command::Command;
use quizwings_core::ids::{QuizId, UserId};
use quizwings_quiz::domain::question::Submission;
use uuid::Uuid;

/// Command to enroll a participant in a quiz that has not started.
#[derive(Debug, Clone)]
pub struct JoinQuiz {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The quiz to join.
    pub quiz_id: QuizId,
    /// The joining participant.
    pub participant_id: UserId,
    /// Name the participant wants the organizer to see, e.g. "Ivan Petrov 5406".
    pub display_name: Option<String>,
    /// The participant's name on the transport platform.
    pub platform_name: Option<String>,
}

impl Command for JoinQuiz {
    fn command_type(&self) -> &'static str {
        "session.join"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to start a quiz and send the first question to everyone enrolled.
#[derive(Debug, Clone)]
pub struct StartQuiz {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The quiz to start.
    pub quiz_id: QuizId,
    /// Who is asking; must own the quiz.
    pub requester_id: UserId,
}

impl Command for StartQuiz {
    fn command_type(&self) -> &'static str {
        "session.start"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to stop a quiz, discarding every unfinished participant.
#[derive(Debug, Clone)]
pub struct StopQuiz {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The quiz to stop.
    pub quiz_id: QuizId,
    /// Who is asking; must own the quiz.
    pub requester_id: UserId,
}

impl Command for StopQuiz {
    fn command_type(&self) -> &'static str {
        "session.stop"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command carrying a participant's answer to their current question.
#[derive(Debug, Clone)]
pub struct SubmitAnswer {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The quiz being answered.
    pub quiz_id: QuizId,
    /// The answering participant.
    pub participant_id: UserId,
    /// What they answered.
    pub submission: Submission,
}

impl Command for SubmitAnswer {
    fn command_type(&self) -> &'static str {
        "session.answer"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
