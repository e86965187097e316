//! Shared application state.

use std::sync::Arc;

use quizwings_core::clock::Clock;
use quizwings_core::identity::IdentityDirectory;
use quizwings_core::repository::{QuizRepository, ResultRepository};
use quizwings_session::application::collaborators::Collaborators;
use quizwings_session::application::engine::AdvancementEngine;
use quizwings_session::application::lifecycle::LifecycleController;
use quizwings_session::domain::registry::SessionRegistry;

use crate::outbox::Outbox;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Quiz storage.
    pub quizzes: Arc<dyn QuizRepository>,
    /// Result storage.
    pub results: Arc<dyn ResultRepository>,
    /// Participant and organizer names.
    pub identities: Arc<dyn IdentityDirectory>,
    /// Delivered messages awaiting pickup.
    pub outbox: Arc<Outbox>,
    /// Live sessions of this process.
    pub registry: Arc<SessionRegistry>,
    /// Answer grading and advancement.
    pub engine: Arc<AdvancementEngine>,
    /// Join, start and stop.
    pub lifecycle: Arc<LifecycleController>,
}

impl AppState {
    /// Wires the session components around one registry and one outbox.
    #[must_use]
    pub fn new(
        quizzes: Arc<dyn QuizRepository>,
        results: Arc<dyn ResultRepository>,
        identities: Arc<dyn IdentityDirectory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let outbox = Arc::new(Outbox::new());
        let registry = Arc::new(SessionRegistry::new());
        let collaborators = Collaborators {
            quizzes: Arc::clone(&quizzes),
            results: Arc::clone(&results),
            delivery: outbox.clone(),
            identities: Arc::clone(&identities),
            clock,
        };
        Self {
            engine: Arc::new(AdvancementEngine::new(
                Arc::clone(&registry),
                collaborators.clone(),
            )),
            lifecycle: Arc::new(LifecycleController::new(
                Arc::clone(&registry),
                collaborators,
            )),
            quizzes,
            results,
            identities,
            outbox,
            registry,
        }
    }
}
