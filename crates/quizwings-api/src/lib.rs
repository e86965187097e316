//! Quiz Wings HTTP API.
//!
//! Exposes quiz authoring, the session lifecycle and answer submission over
//! JSON, and realizes message delivery as a per-user outbox that clients
//! drain.

pub mod config;
pub mod error;
pub mod outbox;
pub mod routes;
pub mod state;
