//! Error types for the command execution pipeline.

use crate::command::{CombatError, CommandKind};
use crate::error::{ErrorSeverity, GameError};

/// Identifies which stage of the transition pipeline produced an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionPhase {
    PreValidate,
    Apply,
    PostValidate,
}

impl TransitionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPhase::PreValidate => "pre_validate",
            TransitionPhase::Apply => "apply",
            TransitionPhase::PostValidate => "post_validate",
        }
    }
}

/// Associates a transition phase with the underlying error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionPhaseError<E> {
    pub phase: TransitionPhase,
    pub error: E,
}

impl<E> TransitionPhaseError<E> {
    pub fn new(phase: TransitionPhase, error: E) -> Self {
        Self { phase, error }
    }
}

impl<E: std::fmt::Display> std::fmt::Display for TransitionPhaseError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.phase.as_str(), self.error)
    }
}

impl<E: std::fmt::Display + std::fmt::Debug> std::error::Error for TransitionPhaseError<E> {}

/// Error surfaced while executing a command through the combat engine.
///
/// The session state is unchanged whenever this is returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[error("{kind} command failed at nonce {nonce}: {source}")]
pub struct ExecuteError {
    pub kind: CommandKind,
    pub nonce: u64,
    pub source: TransitionPhaseError<CombatError>,
}

impl ExecuteError {
    pub fn new(kind: CommandKind, nonce: u64, source: TransitionPhaseError<CombatError>) -> Self {
        Self {
            kind,
            nonce,
            source,
        }
    }

    /// The rejection reason, without pipeline context.
    pub fn error(&self) -> &CombatError {
        &self.source.error
    }

    pub fn phase(&self) -> TransitionPhase {
        self.source.phase
    }
}

impl GameError for ExecuteError {
    fn severity(&self) -> ErrorSeverity {
        match self.source.phase {
            TransitionPhase::PreValidate => self.source.error.severity(),
            TransitionPhase::Apply | TransitionPhase::PostValidate => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        self.source.error.error_code()
    }
}
