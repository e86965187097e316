//! Outbound delivery collaborator.
//!
//! Transports render a [`QuestionPrompt`] however suits them (a poll, a
//! numbered list, buttons) and report the participant's reply back to the
//! session engine as an answer submission.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::UserId;

/// What a participant is shown for one question. Never carries the answer key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuestionPrompt {
    /// Pick one or more of `options`; the reply is the set of chosen indices.
    MultipleChoice {
        /// The question text.
        prompt: String,
        /// Option texts, in display order.
        options: Vec<String>,
    },
    /// Reply with free text.
    FreeText {
        /// The question text.
        prompt: String,
    },
}

impl QuestionPrompt {
    /// The question text.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::MultipleChoice { prompt, .. } | Self::FreeText { prompt } => prompt,
        }
    }
}

/// Sends questions and notifications to users.
#[async_trait]
pub trait Delivery: Send + Sync {
    /// Deliver a question. `ordinal` is 1-based.
    async fn send_question(
        &self,
        recipient: UserId,
        question: &QuestionPrompt,
        ordinal: usize,
    ) -> Result<(), DomainError>;

    /// Deliver a plain text notification.
    async fn send_text(&self, recipient: UserId, text: &str) -> Result<(), DomainError>;
}
