//! Application layer for running quiz sessions.

pub mod collaborators;
pub mod engine;
pub mod lifecycle;
pub mod query_handlers;
