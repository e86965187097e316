//! Per-user mailbox that realizes delivery over HTTP polling.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use quizwings_core::delivery::{Delivery, QuestionPrompt};
use quizwings_core::error::DomainError;
use quizwings_core::ids::UserId;
use serde::Serialize;
use tracing::warn;

/// Messages kept per user before the oldest is dropped.
pub const OUTBOX_CAPACITY: usize = 256;

/// A message waiting to be fetched by its recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboxMessage {
    Question {
        ordinal: usize,
        question: QuestionPrompt,
    },
    Text {
        text: String,
    },
}

/// In-memory outbox. Every send succeeds; recipients drain their queue
/// through `GET /api/v1/inbox/{user_id}`.
#[derive(Debug, Default)]
pub struct Outbox {
    queues: Mutex<HashMap<UserId, VecDeque<OutboxMessage>>>,
}

impl Outbox {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes every pending message for `user`, oldest first.
    pub fn drain(&self, user: UserId) -> Vec<OutboxMessage> {
        self.queues()
            .remove(&user)
            .map(Vec::from)
            .unwrap_or_default()
    }

    fn queues(&self) -> MutexGuard<'_, HashMap<UserId, VecDeque<OutboxMessage>>> {
        self.queues.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, recipient: UserId, message: OutboxMessage) {
        let mut queues = self.queues();
        let queue = queues.entry(recipient).or_default();
        if queue.len() == OUTBOX_CAPACITY {
            queue.pop_front();
            warn!(%recipient, "outbox full; oldest message dropped");
        }
        queue.push_back(message);
    }
}

#[async_trait]
impl Delivery for Outbox {
    async fn send_question(
        &self,
        recipient: UserId,
        question: &QuestionPrompt,
        ordinal: usize,
    ) -> Result<(), DomainError> {
        self.push(
            recipient,
            OutboxMessage::Question {
                ordinal,
                question: question.clone(),
            },
        );
        Ok(())
    }

    async fn send_text(&self, recipient: UserId, text: &str) -> Result<(), DomainError> {
        self.push(
            recipient,
            OutboxMessage::Text {
                text: text.to_owned(),
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: UserId = UserId::new(1);
    const BOB: UserId = UserId::new(2);

    #[tokio::test]
    async fn test_drain_returns_messages_in_send_order_and_empties_queue() {
        // Arrange
        let outbox = Outbox::new();
        let prompt = QuestionPrompt::FreeText {
            prompt: "Capital of France?".into(),
        };
        outbox.send_text(ALICE, "welcome").await.unwrap();
        outbox.send_question(ALICE, &prompt, 1).await.unwrap();
        outbox.send_text(BOB, "hi bob").await.unwrap();

        // Act
        let drained = outbox.drain(ALICE);

        // Assert
        assert_eq!(
            drained,
            vec![
                OutboxMessage::Text {
                    text: "welcome".into()
                },
                OutboxMessage::Question {
                    ordinal: 1,
                    question: prompt,
                },
            ]
        );
        assert!(outbox.drain(ALICE).is_empty());
        assert_eq!(outbox.drain(BOB).len(), 1);
    }

    #[tokio::test]
    async fn test_full_outbox_drops_oldest_message() {
        let outbox = Outbox::new();
        for n in 0..=OUTBOX_CAPACITY {
            outbox.send_text(ALICE, &format!("message {n}")).await.unwrap();
        }

        let drained = outbox.drain(ALICE);

        assert_eq!(drained.len(), OUTBOX_CAPACITY);
        assert_eq!(
            drained[0],
            OutboxMessage::Text {
                text: "message 1".into()
            }
        );
    }

    #[test]
    fn test_question_message_serializes_with_type_tag() {
        let message = OutboxMessage::Question {
            ordinal: 2,
            question: QuestionPrompt::MultipleChoice {
                prompt: "Pick".into(),
                options: vec!["A".into(), "B".into()],
            },
        };

        let json = serde_json::to_value(&message).unwrap();

        assert_eq!(json["type"], "question");
        assert_eq!(json["ordinal"], 2);
        assert_eq!(json["question"]["kind"], "multiple_choice");
        assert_eq!(json["question"]["options"][1], "B");
    }
}
