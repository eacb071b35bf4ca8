//! Replay of saved sessions.
//!
//! Re-executes `commands.log` from the initial snapshot and checks the state
//! root after every command against the one recorded when it first ran.

use combat_core::{CombatOutcome, CombatSession};

use crate::error::{Result, RuntimeError};
use crate::repository::SessionFiles;

/// Summary of a successful replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayReport {
    pub session_id: String,
    pub commands: usize,
    pub state_root: [u8; 32],
    pub outcome: Option<CombatOutcome>,
    /// True when the manifest recorded a final root and it matched.
    pub final_root_verified: bool,
}

/// Replays one saved session.
pub fn replay(files: &SessionFiles) -> Result<ReplayReport> {
    let manifest = files.load_manifest()?;
    let initial = files
        .load_state(SessionFiles::INITIAL_STATE)?
        .ok_or_else(|| {
            RuntimeError::MissingArtifact(manifest.session_id.clone(), "initial state")
        })?;

    if initial.table_version != manifest.table_version {
        return Err(RuntimeError::TableVersionMismatch {
            manifest: manifest.table_version,
            snapshot: initial.table_version,
        });
    }

    let initial_root = hex::encode(initial.state_root()?);
    if initial_root != manifest.initial_root {
        return Err(RuntimeError::ReplayDiverged {
            nonce: 0,
            expected: manifest.initial_root,
            actual: initial_root,
        });
    }

    let entries = files.read_commands()?;
    tracing::info!(session = %manifest.session_id, commands = entries.len(), "replaying session");

    let mut session = CombatSession::from_state(initial, manifest.config.clone());
    for entry in &entries {
        session
            .execute(&entry.command)
            .map_err(|source| RuntimeError::ReplayRejected {
                nonce: entry.nonce,
                source,
            })?;

        let root = session.state().state_root()?;
        if root != entry.state_root {
            return Err(RuntimeError::ReplayDiverged {
                nonce: entry.nonce,
                expected: hex::encode(entry.state_root),
                actual: hex::encode(root),
            });
        }
        tracing::debug!(nonce = entry.nonce, kind = %entry.command.kind(), "replayed command");
    }

    let state_root = session.state().state_root()?;
    let final_root_verified = match &manifest.final_root {
        Some(expected) => {
            let actual = hex::encode(state_root);
            if &actual != expected {
                return Err(RuntimeError::ReplayDiverged {
                    nonce: session.state().nonce,
                    expected: expected.clone(),
                    actual,
                });
            }
            true
        }
        None => false,
    };

    Ok(ReplayReport {
        session_id: manifest.session_id,
        commands: entries.len(),
        state_root,
        outcome: session.outcome(),
        final_root_verified,
    })
}
