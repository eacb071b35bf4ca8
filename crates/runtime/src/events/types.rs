//! Event payloads published on the bus and written to `events.log`.

use serde::{Deserialize, Serialize};

use combat_core::{
    CombatEvent, CombatOutcome, CombatTrigger, CommandKind, EnemyTypeId, ErrorSeverity,
};

/// A domain event together with the command nonce that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatEventRecord {
    pub nonce: u64,
    pub event: CombatEvent,
}

/// Outcome of one submitted command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandEvent {
    Executed {
        nonce: u64,
        kind: CommandKind,
        /// Number of domain events the command emitted.
        events: usize,
    },
    Rejected {
        nonce: u64,
        kind: CommandKind,
        code: String,
        severity: ErrorSeverity,
        message: String,
    },
}

impl CommandEvent {
    pub fn nonce(&self) -> u64 {
        match self {
            Self::Executed { nonce, .. } | Self::Rejected { nonce, .. } => *nonce,
        }
    }

    pub fn kind(&self) -> CommandKind {
        match self {
            Self::Executed { kind, .. } | Self::Rejected { kind, .. } => *kind,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

/// Session lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    Opened {
        session_id: String,
        trigger: CombatTrigger,
        table_version: u32,
        enemies: Vec<EnemyTypeId>,
    },
    Closed {
        session_id: String,
        outcome: Option<CombatOutcome>,
        fame: u32,
        commands: u64,
        state_root: [u8; 32],
    },
}
