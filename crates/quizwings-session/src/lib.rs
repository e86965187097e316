//! Quiz Wings — session orchestration.
//!
//! Tracks which quizzes are running and who takes part in each, grades
//! incoming answers, advances every participant independently through the
//! question sequence, and finalizes their results. All runtime state lives
//! in a [`domain::registry::SessionRegistry`] owned by the caller.

pub mod application;
pub mod domain;
