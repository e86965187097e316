//! Application handlers for quiz authoring and reporting.

pub mod access;
pub mod command_handlers;
pub mod query_handlers;
