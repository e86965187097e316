//! Quiz Wings Core — shared domain abstractions.
//!
//! This crate defines the identifiers, traits and record shapes that the
//! quiz and session crates depend on, including the boundary traits for the
//! storage, delivery and identity collaborators. It contains no
//! infrastructure code.

pub mod clock;
pub mod command;
pub mod delivery;
pub mod error;
pub mod ids;
pub mod identity;
pub mod repository;
