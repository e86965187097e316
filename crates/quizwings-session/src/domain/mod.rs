//! Domain layer for running quiz sessions.

pub mod commands;
pub mod notifications;
pub mod outcome;
pub mod phase;
pub mod progress;
pub mod registry;
