//! Common error infrastructure for combat-core.
//!
//! This module provides the shared classification used by every error type
//! in the crate. Domain-specific errors (e.g. [`CombatError`]) are defined
//! next to the commands they validate.
//!
//! # Design Principles
//!
//! - **No silent clamping**: every insufficiency is surfaced with the numbers
//!   a caller needs to render "need N more"
//! - **Severity Classification**: errors are categorized for recovery strategies
//! - **Stable codes**: each variant maps to a static identifier for logs and tests
//!
//! [`CombatError`]: crate::command::CombatError

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the command may succeed later (different phase, more strength)
/// - **Validation**: the command references something invalid and must change
/// - **Internal**: an invariant check failed after mutation; indicates a bug
/// - **Fatal**: the session cannot continue
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry with same or alternative command.
    ///
    /// Examples: insufficient pool, phase violation
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: unknown enemy, zero amount
    Validation,

    /// Internal error - unexpected state inconsistency.
    Internal,

    /// Fatal error - session state cannot be trusted.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all combat-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
