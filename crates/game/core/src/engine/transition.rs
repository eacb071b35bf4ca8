//! Command dispatch and execution logic.

use crate::command::{CombatCommand, CommandResult, CommandTransition};
use crate::env::CombatEnv;
use crate::state::CombatState;

use super::errors::{TransitionPhase, TransitionPhaseError};

/// Executes a transition through the three-phase pipeline and returns the result.
///
/// Phases:
/// 1. `pre_validate` - Check preconditions before mutation
/// 2. `apply` - Mutate the combat state and return result
/// 3. `post_validate` - Verify postconditions after mutation
#[inline]
fn drive_transition<T>(
    transition: &T,
    state: &mut CombatState,
    env: &CombatEnv<'_>,
) -> Result<T::Result, TransitionPhaseError<T::Error>>
where
    T: CommandTransition,
{
    transition
        .pre_validate(state, env)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PreValidate, error))?;

    let result = transition
        .apply(state, env)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::Apply, error))?;

    transition
        .post_validate(state, env)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PostValidate, error))?;

    Ok(result)
}

/// Routes each command to its transition and wraps the result.
pub(super) fn execute_transition(
    command: &CombatCommand,
    state: &mut CombatState,
    env: &CombatEnv<'_>,
) -> Result<CommandResult, TransitionPhaseError<crate::command::CombatError>> {
    let result = match command {
        CombatCommand::Start(transition) => {
            CommandResult::Phase(drive_transition(transition, state, env)?)
        }
        CombatCommand::Contribute(transition) => CommandResult::Contributed {
            balance: drive_transition(transition, state, env)?,
        },
        CombatCommand::AssignBlock(transition) => {
            CommandResult::Assigned(drive_transition(transition, state, env)?)
        }
        CombatCommand::UnassignBlock(transition) => {
            drive_transition(transition, state, env)?;
            CommandResult::Done
        }
        CombatCommand::AbandonBlock(transition) => {
            drive_transition(transition, state, env)?;
            CommandResult::Done
        }
        CombatCommand::ReduceAttack(transition) => {
            drive_transition(transition, state, env)?;
            CommandResult::Done
        }
        CombatCommand::AssignAttack(transition) => {
            CommandResult::Assigned(drive_transition(transition, state, env)?)
        }
        CombatCommand::UnassignAttack(transition) => {
            drive_transition(transition, state, env)?;
            CommandResult::Done
        }
        CombatCommand::AbandonAttack(transition) => {
            drive_transition(transition, state, env)?;
            CommandResult::Done
        }
        CombatCommand::AssignDamage(transition) => {
            CommandResult::Damage(drive_transition(transition, state, env)?)
        }
        CombatCommand::AdvancePhase(transition) => {
            CommandResult::Phase(drive_transition(transition, state, env)?)
        }
        CombatCommand::Withdraw(transition) => {
            CommandResult::Phase(drive_transition(transition, state, env)?)
        }
    };
    Ok(result)
}
