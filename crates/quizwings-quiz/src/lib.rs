//! Quiz Wings — question model and quiz definitions.
//!
//! Responsible for the typed question model, parsing stored quiz content
//! into validated definitions, grading submissions, and the organizer-facing
//! authoring and reporting operations.

pub mod application;
pub mod domain;
