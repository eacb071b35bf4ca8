//! Command execution pipeline.
//!
//! The [`CombatEngine`] is the authoritative reducer for [`CombatState`]. It
//! runs each command through its transition phases, restores the previous
//! state when a command fails after mutation began, and returns the events
//! the command appended.

mod errors;
mod transition;

pub use errors::{ExecuteError, TransitionPhase, TransitionPhaseError};

use crate::command::{CombatCommand, CombatError, CommandResult};
use crate::env::CombatEnv;
use crate::events::CombatEvent;
use crate::state::CombatState;

/// Complete outcome of command execution.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExecutionOutcome {
    /// Command-specific result (assignment handle, new phase, ...).
    pub result: CommandResult,

    /// Events appended to the log by this command, in order. Never empty.
    pub events: Vec<CombatEvent>,
}

impl ExecutionOutcome {
    pub fn assignment(&self) -> Option<crate::types::AssignmentId> {
        self.result.assignment()
    }
}

/// Combat engine borrowing one session's state for the duration of a command.
///
/// All state mutations flow through the three-phase pipeline:
/// pre_validate → apply → post_validate
pub struct CombatEngine<'a> {
    state: &'a mut CombatState,
}

impl<'a> CombatEngine<'a> {
    pub fn new(state: &'a mut CombatState) -> Self {
        Self { state }
    }

    /// Executes a command and returns its result together with its events.
    ///
    /// On error the state is exactly as it was before the call.
    pub fn execute(
        &mut self,
        env: CombatEnv<'_>,
        command: &CombatCommand,
    ) -> Result<ExecutionOutcome, ExecuteError> {
        let kind = command.kind();
        let nonce = self.state.nonce;
        let before = self.state.clone();
        let mark = self.state.events.len();

        let result = match transition::execute_transition(command, self.state, &env) {
            Ok(result) => result,
            Err(source) => {
                *self.state = before;
                return Err(ExecuteError::new(kind, nonce, source));
            }
        };

        // Phase monotonicity is checked against the pre-command snapshot.
        if self.state.phase < before.phase {
            let error = CombatError::PhaseRegressed {
                from: before.phase,
                to: self.state.phase,
            };
            *self.state = before;
            return Err(ExecuteError::new(
                kind,
                nonce,
                TransitionPhaseError::new(TransitionPhase::PostValidate, error),
            ));
        }

        self.state.nonce += 1;

        Ok(ExecutionOutcome {
            result,
            events: self.state.events.since(mark).to_vec(),
        })
    }
}
