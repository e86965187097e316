//! Domain model for quizzes and questions.

pub mod commands;
pub mod content;
pub mod question;
pub mod quiz;
