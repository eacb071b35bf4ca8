//! Combat commands and their transition pipeline.
//!
//! Every mutation of a [`CombatState`] is one of the commands below. Each
//! implements [`CommandTransition`]: `pre_validate` rejects the command
//! without touching state, `apply` mutates and appends events, and
//! `post_validate` re-checks state-wide invariants.

mod attack;
mod block;
mod contribute;
mod damage;
mod error;
mod phase;

pub use attack::{AbandonAttack, AssignAttack, UnassignAttack};
pub use block::{AbandonBlock, AssignBlock, ReduceAttack, UnassignBlock};
pub use contribute::Contribute;
pub use damage::AssignDamage;
pub use error::{CombatError, Ineligibility, PhaseRule, Resolution};
pub use phase::{AdvancePhase, StartCombat, Withdraw};

use crate::env::CombatEnv;
use crate::events::DamageOutcome;
use crate::state::{CombatPhase, CombatState};
use crate::types::{AssignmentId, EnemyInstanceId};

/// Defines how a command validates and mutates combat state.
pub trait CommandTransition {
    type Error;
    type Result;

    /// Validates pre-conditions using the state **before** mutation.
    fn pre_validate(&self, _state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Mutates the state. Assumes `pre_validate` succeeded.
    fn apply(&self, state: &mut CombatState, env: &CombatEnv<'_>) -> Result<Self::Result, Self::Error>;

    /// Validates post-conditions using the state **after** mutation.
    fn post_validate(&self, _state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Discriminant of [`CombatCommand`], used in logs and errors.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum CommandKind {
    Start,
    Contribute,
    AssignBlock,
    UnassignBlock,
    AbandonBlock,
    ReduceAttack,
    AssignAttack,
    UnassignAttack,
    AbandonAttack,
    AssignDamage,
    AdvancePhase,
    Withdraw,
}

/// Every command the combat engine accepts.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatCommand {
    Start(StartCombat),
    Contribute(Contribute),
    AssignBlock(AssignBlock),
    UnassignBlock(UnassignBlock),
    AbandonBlock(AbandonBlock),
    ReduceAttack(ReduceAttack),
    AssignAttack(AssignAttack),
    UnassignAttack(UnassignAttack),
    AbandonAttack(AbandonAttack),
    AssignDamage(AssignDamage),
    AdvancePhase(AdvancePhase),
    Withdraw(Withdraw),
}

impl CombatCommand {
    pub fn kind(&self) -> CommandKind {
        match self {
            Self::Start(_) => CommandKind::Start,
            Self::Contribute(_) => CommandKind::Contribute,
            Self::AssignBlock(_) => CommandKind::AssignBlock,
            Self::UnassignBlock(_) => CommandKind::UnassignBlock,
            Self::AbandonBlock(_) => CommandKind::AbandonBlock,
            Self::ReduceAttack(_) => CommandKind::ReduceAttack,
            Self::AssignAttack(_) => CommandKind::AssignAttack,
            Self::UnassignAttack(_) => CommandKind::UnassignAttack,
            Self::AbandonAttack(_) => CommandKind::AbandonAttack,
            Self::AssignDamage(_) => CommandKind::AssignDamage,
            Self::AdvancePhase(_) => CommandKind::AdvancePhase,
            Self::Withdraw(_) => CommandKind::Withdraw,
        }
    }
}

macro_rules! impl_from_command {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for CombatCommand {
                fn from(command: $ty) -> Self {
                    Self::$variant(command)
                }
            }
        )*
    };
}

impl_from_command!(
    Start(StartCombat),
    Contribute(Contribute),
    AssignBlock(AssignBlock),
    UnassignBlock(UnassignBlock),
    AbandonBlock(AbandonBlock),
    ReduceAttack(ReduceAttack),
    AssignAttack(AssignAttack),
    UnassignAttack(UnassignAttack),
    AbandonAttack(AbandonAttack),
    AssignDamage(AssignDamage),
    AdvancePhase(AdvancePhase),
    Withdraw(Withdraw),
);

/// Command-specific result of a successful execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommandResult {
    /// No payload beyond the emitted events.
    Done,
    /// New balance of the bucket that received strength.
    Contributed { balance: u32 },
    /// Handle for a block or attack assignment.
    Assigned(AssignmentId),
    /// Phase after the command.
    Phase(CombatPhase),
    /// Effect of one damage entry on its target.
    Damage(DamageOutcome),
}

impl CommandResult {
    pub fn assignment(&self) -> Option<AssignmentId> {
        match self {
            Self::Assigned(id) => Some(*id),
            _ => None,
        }
    }
}

// ===== checks shared by several commands =====

fn require_phase(state: &CombatState, phase: CombatPhase) -> Result<(), CombatError> {
    if state.phase == phase {
        Ok(())
    } else {
        Err(CombatError::phase(state.phase, PhaseRule::Requires(phase)))
    }
}

fn require_active(state: &CombatState) -> Result<(), CombatError> {
    if state.is_active() {
        Ok(())
    } else {
        Err(CombatError::phase(state.phase, PhaseRule::Inactive))
    }
}

fn require_amount(amount: u32) -> Result<(), CombatError> {
    if amount == 0 {
        Err(CombatError::InvalidAmount)
    } else {
        Ok(())
    }
}

/// Looks up an enemy that can still be targeted.
fn live_enemy(
    state: &CombatState,
    id: EnemyInstanceId,
) -> Result<&crate::state::EnemyInstance, CombatError> {
    let enemy = state.enemy(id).ok_or(CombatError::UnknownEnemy(id))?;
    if enemy.defeated {
        return Err(CombatError::AlreadyResolved(Resolution::EnemyDefeated(id)));
    }
    if enemy.dismissed {
        return Err(CombatError::AlreadyResolved(Resolution::EnemyDismissed(id)));
    }
    Ok(enemy)
}

/// State-wide invariants re-checked after every mutation.
fn check_invariants(state: &CombatState) -> Result<(), CombatError> {
    if state.pool.is_conserved() {
        Ok(())
    } else {
        Err(CombatError::PoolNotConserved)
    }
}
