//! Unified error types surfaced by the runtime API.
//!
//! Wraps setup, command and repository failures so callers can bubble them
//! up with consistent context.

use thiserror::Error;

use combat_core::{ExecuteError, SetupError};

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("combat setup failed")]
    Setup(#[from] SetupError),

    #[error(transparent)]
    Command(#[from] ExecuteError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("failed to hash combat state")]
    StateRoot(#[from] bincode::Error),

    #[error("runtime halted: command {nonce} was applied but not logged")]
    Halted { nonce: u64 },

    #[error("session '{0}' has no saved {1}")]
    MissingArtifact(String, &'static str),

    #[error("replay rejected command {nonce}")]
    ReplayRejected {
        nonce: u64,
        #[source]
        source: ExecuteError,
    },

    #[error("manifest records enemy table v{manifest} but the snapshot was built from v{snapshot}")]
    TableVersionMismatch { manifest: u32, snapshot: u32 },

    #[error("replay diverged at command {nonce}: expected root {expected}, got {actual}")]
    ReplayDiverged {
        nonce: u64,
        expected: String,
        actual: String,
    },
}

impl RuntimeError {
    /// The engine error behind a rejected command, if any.
    pub fn command_error(&self) -> Option<&ExecuteError> {
        match self {
            Self::Command(err) | Self::ReplayRejected { source: err, .. } => Some(err),
            _ => None,
        }
    }
}
