//! Runtime orchestration for combat sessions.
//!
//! This crate wraps a [`combat_core::CombatSession`] with structured logging,
//! an append-only command and event log, and a topic-based event bus.
//! Consumers build a [`CombatRuntime`] from a session, feed it commands and
//! subscribe to the topics they render.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the session wrapper and builder
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`repository`] persists sessions (manifest, snapshots, logs)
//! - [`replay`] re-executes saved sessions and verifies state roots
pub mod error;
pub mod events;
pub mod replay;
pub mod repository;
pub mod runtime;

pub use error::{Result, RuntimeError};
pub use events::{CombatEventRecord, CommandEvent, Event, EventBus, SessionEvent, Topic};
pub use replay::{ReplayReport, replay};
pub use repository::{
    CommandLogEntry, CommandRepository, EventRepository, FileCommandLog, FileEventLog,
    FileRepository, MemoryLog, RepositoryError, SessionCatalog, SessionFiles, SessionManifest,
    SessionStore,
};
pub use runtime::{CombatRuntime, RuntimeBuilder, RuntimeConfig, new_session_id};
