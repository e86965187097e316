//! Shared test doubles and utilities for the Quiz Wings session engine.

mod clock;
mod delivery;
mod repository;

pub use clock::FixedClock;
pub use delivery::{FailingDelivery, RecordingDelivery, Sent};
pub use repository::{FailingQuizRepository, FailingResultRepository};
