//! Test deliveries: `Delivery` implementations that record or fail.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use quizwings_core::delivery::{Delivery, QuestionPrompt};
use quizwings_core::error::DomainError;
use quizwings_core::ids::UserId;

/// One message handed to a [`RecordingDelivery`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Question {
        recipient: UserId,
        prompt: QuestionPrompt,
        ordinal: usize,
    },
    Text {
        recipient: UserId,
        text: String,
    },
}

impl Sent {
    #[must_use]
    pub fn recipient(&self) -> UserId {
        match self {
            Self::Question { recipient, .. } | Self::Text { recipient, .. } => *recipient,
        }
    }
}

/// A delivery that records every message in send order. Recipients listed
/// as unreachable get an infrastructure error instead.
#[derive(Debug, Default)]
pub struct RecordingDelivery {
    sent: Mutex<Vec<Sent>>,
    unreachable: HashSet<UserId>,
}

impl RecordingDelivery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A recording delivery that refuses to deliver to `unreachable`.
    #[must_use]
    pub fn with_unreachable(unreachable: impl IntoIterator<Item = UserId>) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            unreachable: unreachable.into_iter().collect(),
        }
    }

    /// Returns a snapshot of everything sent so far.
    pub fn sent(&self) -> Vec<Sent> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Questions sent to `recipient` as `(ordinal, prompt text)` pairs.
    pub fn questions_for(&self, recipient: UserId) -> Vec<(usize, String)> {
        self.sent()
            .into_iter()
            .filter_map(|sent| match sent {
                Sent::Question {
                    recipient: to,
                    prompt,
                    ordinal,
                } if to == recipient => Some((ordinal, prompt.text().to_owned())),
                _ => None,
            })
            .collect()
    }

    /// Text notifications sent to `recipient`.
    pub fn texts_for(&self, recipient: UserId) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|sent| match sent {
                Sent::Text {
                    recipient: to,
                    text,
                } if to == recipient => Some(text),
                _ => None,
            })
            .collect()
    }

    fn record(&self, recipient: UserId, sent: Sent) -> Result<(), DomainError> {
        if self.unreachable.contains(&recipient) {
            return Err(DomainError::Infrastructure(format!(
                "user {recipient} is unreachable"
            )));
        }
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sent);
        Ok(())
    }
}

#[async_trait]
impl Delivery for RecordingDelivery {
    async fn send_question(
        &self,
        recipient: UserId,
        question: &QuestionPrompt,
        ordinal: usize,
    ) -> Result<(), DomainError> {
        self.record(
            recipient,
            Sent::Question {
                recipient,
                prompt: question.clone(),
                ordinal,
            },
        )
    }

    async fn send_text(&self, recipient: UserId, text: &str) -> Result<(), DomainError> {
        self.record(
            recipient,
            Sent::Text {
                recipient,
                text: text.to_owned(),
            },
        )
    }
}

/// A delivery that fails every send.
#[derive(Debug)]
pub struct FailingDelivery;

#[async_trait]
impl Delivery for FailingDelivery {
    async fn send_question(
        &self,
        _recipient: UserId,
        _question: &QuestionPrompt,
        _ordinal: usize,
    ) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("transport unavailable".into()))
    }

    async fn send_text(&self, _recipient: UserId, _text: &str) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("transport unavailable".into()))
    }
}
