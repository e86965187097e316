//! Shared fixtures for session integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use quizwings_core::ids::{QuizId, UserId};
use quizwings_core::repository::{QuizRepository, StoredQuiz};
use quizwings_quiz::domain::question::Submission;
use quizwings_session::application::collaborators::Collaborators;
use quizwings_session::application::engine::AdvancementEngine;
use quizwings_session::application::lifecycle::LifecycleController;
use quizwings_session::domain::commands::{JoinQuiz, StartQuiz, StopQuiz, SubmitAnswer};
use quizwings_session::domain::registry::SessionRegistry;
use quizwings_store::memory::{
    InMemoryIdentityDirectory, InMemoryQuizRepository, InMemoryResultRepository,
};
use quizwings_test_support::{FixedClock, RecordingDelivery};
use uuid::Uuid;

pub const QUIZ: QuizId = QuizId::new(7);
pub const ORGANIZER: UserId = UserId::new(1);
pub const PARTICIPANT: UserId = UserId::new(100);
pub const OTHER: UserId = UserId::new(200);

/// Quiz 7: a multiple-choice question with option 1 correct, then a
/// free-text question expecting "paris".
pub const CAPITALS: &str = r#"{"questions": [
    {"type": "multiple_choice", "question": "Which city is the capital of France?",
     "options": ["Lyon", "Paris", "Nice"], "correct": [1]},
    {"type": "written", "question": "Name the capital of France", "correct": "paris"}
]}"#;

/// In-memory collaborators around one shared registry.
pub struct Harness {
    pub registry: Arc<SessionRegistry>,
    pub quizzes: Arc<InMemoryQuizRepository>,
    pub results: Arc<InMemoryResultRepository>,
    pub delivery: Arc<RecordingDelivery>,
    pub identities: Arc<InMemoryIdentityDirectory>,
    pub clock: Arc<FixedClock>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_delivery(RecordingDelivery::new())
    }

    pub fn with_delivery(delivery: RecordingDelivery) -> Self {
        Self {
            registry: Arc::new(SessionRegistry::new()),
            quizzes: Arc::new(InMemoryQuizRepository::new()),
            results: Arc::new(InMemoryResultRepository::new()),
            delivery: Arc::new(delivery),
            identities: Arc::new(InMemoryIdentityDirectory::new()),
            clock: Arc::new(FixedClock::new(
                Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
            )),
        }
    }

    /// Harness with quiz 7 already stored.
    pub async fn with_capitals() -> Self {
        let harness = Self::new();
        harness.seed(QUIZ, CAPITALS).await;
        harness
    }

    pub async fn seed(&self, quiz_id: QuizId, content: &str) {
        self.quizzes
            .save_quiz(&StoredQuiz {
                id: quiz_id,
                name: "Capitals".into(),
                owner_id: ORGANIZER,
                content: content.into(),
                active: false,
            })
            .await
            .unwrap();
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            quizzes: self.quizzes.clone(),
            results: self.results.clone(),
            delivery: self.delivery.clone(),
            identities: self.identities.clone(),
            clock: self.clock.clone(),
        }
    }

    pub fn engine(&self) -> AdvancementEngine {
        AdvancementEngine::new(Arc::clone(&self.registry), self.collaborators())
    }

    pub fn lifecycle(&self) -> LifecycleController {
        LifecycleController::new(Arc::clone(&self.registry), self.collaborators())
    }

    pub async fn is_active(&self, quiz_id: QuizId) -> bool {
        self.quizzes.load_quiz(quiz_id).await.unwrap().unwrap().active
    }

    /// Enrolls `participants` in quiz 7 and starts it.
    pub async fn start_with(&self, participants: &[UserId]) {
        let lifecycle = self.lifecycle();
        for participant in participants {
            lifecycle.join(&join(QUIZ, *participant)).await.unwrap();
        }
        lifecycle.start(&start(QUIZ, ORGANIZER)).await.unwrap();
    }
}

pub fn join(quiz_id: QuizId, participant_id: UserId) -> JoinQuiz {
    JoinQuiz {
        correlation_id: Uuid::new_v4(),
        quiz_id,
        participant_id,
        display_name: None,
        platform_name: None,
    }
}

pub fn start(quiz_id: QuizId, requester_id: UserId) -> StartQuiz {
    StartQuiz {
        correlation_id: Uuid::new_v4(),
        quiz_id,
        requester_id,
    }
}

pub fn stop(quiz_id: QuizId, requester_id: UserId) -> StopQuiz {
    StopQuiz {
        correlation_id: Uuid::new_v4(),
        quiz_id,
        requester_id,
    }
}

pub fn answer(participant_id: UserId, submission: Submission) -> SubmitAnswer {
    SubmitAnswer {
        correlation_id: Uuid::new_v4(),
        quiz_id: QUIZ,
        participant_id,
        submission,
    }
}

pub fn choices(indices: &[usize]) -> Submission {
    Submission::Choices(indices.to_vec())
}

pub fn text(value: &str) -> Submission {
    Submission::Text(value.into())
}
