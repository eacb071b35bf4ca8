//! Records persisted for each combat session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use combat_core::{CombatCommand, CombatConfig, CombatOutcome, CombatTrigger, EnemyTypeId};

/// One successfully executed command, as stored in `commands.log`.
///
/// Rejected commands never reach this log; replaying it from the initial
/// snapshot must reproduce `state_root` after every entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandLogEntry {
    /// Nonce the command executed at (state nonce before execution).
    pub nonce: u64,
    pub command: CombatCommand,
    /// State root after the command.
    pub state_root: [u8; 32],
}

/// Human-readable description of a saved session (`manifest.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionManifest {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub scenario: Option<String>,
    pub trigger: CombatTrigger,
    pub enemies: Vec<EnemyTypeId>,
    pub table_version: u32,
    pub config: CombatConfig,
    /// Hex state root of the initial snapshot.
    pub initial_root: String,
    #[serde(default)]
    pub final_root: Option<String>,
    #[serde(default)]
    pub outcome: Option<CombatOutcome>,
    #[serde(default)]
    pub fame: u32,
    #[serde(default)]
    pub commands: u64,
}

impl SessionManifest {
    pub fn is_closed(&self) -> bool {
        self.final_root.is_some()
    }
}
