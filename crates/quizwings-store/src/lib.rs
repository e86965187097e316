//! Quiz Wings storage — quiz, result and identity collaborators.
//!
//! `memory` keeps everything in process and is what the engine runs on when
//! no database is configured; `pg` persists quizzes and results in
//! PostgreSQL.

pub mod memory;
pub mod pg;

/// Embedded SQL migrations for the PostgreSQL store.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");
