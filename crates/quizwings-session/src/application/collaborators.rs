//! The external collaborators a session needs, bundled for injection.

use std::sync::Arc;

use quizwings_core::clock::Clock;
use quizwings_core::delivery::Delivery;
use quizwings_core::identity::IdentityDirectory;
use quizwings_core::ids::UserId;
use quizwings_core::repository::{QuizRepository, ResultRepository};
use tracing::warn;

/// Storage, delivery, identity and time, shared by the engine and the
/// lifecycle controller.
#[derive(Clone)]
pub struct Collaborators {
    pub quizzes: Arc<dyn QuizRepository>,
    pub results: Arc<dyn ResultRepository>,
    pub delivery: Arc<dyn Delivery>,
    pub identities: Arc<dyn IdentityDirectory>,
    pub clock: Arc<dyn Clock>,
}

impl Collaborators {
    /// Sends a text, logging instead of failing when it cannot be delivered.
    /// Session state has already changed by the time anything is sent.
    pub(crate) async fn notify(&self, recipient: UserId, text: &str) {
        if let Err(error) = self.delivery.send_text(recipient, text).await {
            warn!(%recipient, %error, "notification not delivered");
        }
    }
}
