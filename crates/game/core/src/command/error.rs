//! Command rejection taxonomy.
//!
//! Every rejection is raised before any mutation, so a rejected command
//! leaves the session exactly as it was. Insufficiency is always reported
//! with the numbers involved; nothing is clamped.

use crate::error::{ErrorSeverity, GameError};
use crate::pool::{PoolBucket, PoolError};
use crate::state::CombatPhase;
use crate::types::{AssignmentId, AttackType, EnemyInstanceId, UnitId};

/// Why a contribution may not be used against a target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Ineligibility {
    #[error("{0} strength is not accepted in this phase")]
    WrongType(AttackType),

    #[error("only siege strength reaches a fortified enemy")]
    Fortified,

    #[error("{0} is not a valid pool bucket")]
    InvalidBucket(PoolBucket),

    #[error("the enemy is not cumbersome")]
    NotCumbersome,
}

/// What was already settled when a command tried to change it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Resolution {
    #[error("combat already started")]
    CombatStarted,

    #[error("{0} is defeated")]
    EnemyDefeated(EnemyInstanceId),

    #[error("{0} was dismissed")]
    EnemyDismissed(EnemyInstanceId),

    #[error("{enemy} attack {attack_index} is blocked")]
    AttackBlocked {
        enemy: EnemyInstanceId,
        attack_index: usize,
    },

    #[error("{0} attacks through its summoned enemy")]
    AttackDelegated(EnemyInstanceId),

    #[error("{0} was already reversed")]
    AssignmentReversed(AssignmentId),

    #[error("{0} was abandoned")]
    AssignmentAbandoned(AssignmentId),

    #[error("nothing is assigned there")]
    NothingAssigned,

    #[error("damage entry {0} is already assigned")]
    DamageAssigned(usize),

    #[error("{0} is destroyed")]
    UnitDestroyed(UnitId),
}

/// Phase-ordering rule a command broke.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PhaseRule {
    #[error("command is only accepted during {0}")]
    Requires(CombatPhase),

    #[error("attacks are only accepted during ranged_and_siege or attack")]
    AttackClosed,

    #[error("command is not accepted once combat is over or before it starts")]
    Inactive,

    #[error("{0} assignments are still open")]
    OpenAssignments(usize),

    #[error("{0} damage entries are unassigned")]
    PendingDamage(usize),

    #[error("assignment was made in {0} and that phase has ended")]
    PhaseEnded(CombatPhase),

    #[error("withdrawal is not permitted for this combat")]
    WithdrawalRefused,
}

/// Errors surfaced by combat commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatError {
    #[error("ineligible contribution: {0}")]
    IneligibleContribution(Ineligibility),

    #[error("insufficient pool: requested {requested} from {bucket}, only {available} available")]
    InsufficientPool {
        bucket: PoolBucket,
        requested: u32,
        available: u32,
    },

    #[error("already resolved: {0}")]
    AlreadyResolved(Resolution),

    #[error("pool overflow: {bucket} holds {balance} and cannot take {amount} more")]
    PoolOverflow {
        bucket: PoolBucket,
        balance: u32,
        amount: u32,
    },

    #[error("phase violation in {phase}: {rule}")]
    PhaseViolation { phase: CombatPhase, rule: PhaseRule },

    #[error("over-assignment: {requested} requested but only {needed} still needed")]
    OverAssignment { requested: u32, needed: u32 },

    #[error("unknown enemy {0}")]
    UnknownEnemy(EnemyInstanceId),

    #[error("{enemy} has no attack {attack_index}")]
    UnknownAttack {
        enemy: EnemyInstanceId,
        attack_index: usize,
    },

    #[error("unknown unit {0}")]
    UnknownUnit(UnitId),

    #[error("unknown assignment {0}")]
    UnknownAssignment(AssignmentId),

    #[error("unknown damage entry {0}")]
    UnknownDamage(usize),

    #[error("amount must be positive")]
    InvalidAmount,

    #[error("pool conservation broken")]
    PoolNotConserved,

    #[error("phase moved backwards from {from} to {to}")]
    PhaseRegressed { from: CombatPhase, to: CombatPhase },
}

impl CombatError {
    pub(crate) fn phase(phase: CombatPhase, rule: PhaseRule) -> Self {
        Self::PhaseViolation { phase, rule }
    }
}

impl From<PoolError> for CombatError {
    fn from(error: PoolError) -> Self {
        match error {
            PoolError::InvalidBucket(bucket) => {
                Self::IneligibleContribution(Ineligibility::InvalidBucket(bucket))
            }
            PoolError::ZeroAmount => Self::InvalidAmount,
            PoolError::Overflow {
                bucket,
                balance,
                amount,
            } => Self::PoolOverflow {
                bucket,
                balance,
                amount,
            },
            PoolError::Insufficient {
                bucket,
                requested,
                available,
            } => Self::InsufficientPool {
                bucket,
                requested,
                available,
            },
        }
    }
}

impl GameError for CombatError {
    fn severity(&self) -> ErrorSeverity {
        use CombatError::*;
        match self {
            IneligibleContribution(_)
            | InsufficientPool { .. }
            | PoolOverflow { .. }
            | AlreadyResolved(_)
            | PhaseViolation { .. }
            | OverAssignment { .. } => ErrorSeverity::Recoverable,
            UnknownEnemy(_)
            | UnknownAttack { .. }
            | UnknownUnit(_)
            | UnknownAssignment(_)
            | UnknownDamage(_)
            | InvalidAmount => ErrorSeverity::Validation,
            PoolNotConserved | PhaseRegressed { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        use CombatError::*;
        match self {
            IneligibleContribution(_) => "COMBAT_INELIGIBLE_CONTRIBUTION",
            InsufficientPool { .. } => "COMBAT_INSUFFICIENT_POOL",
            PoolOverflow { .. } => "COMBAT_POOL_OVERFLOW",
            AlreadyResolved(_) => "COMBAT_ALREADY_RESOLVED",
            PhaseViolation { .. } => "COMBAT_PHASE_VIOLATION",
            OverAssignment { .. } => "COMBAT_OVER_ASSIGNMENT",
            UnknownEnemy(_) => "COMBAT_UNKNOWN_ENEMY",
            UnknownAttack { .. } => "COMBAT_UNKNOWN_ATTACK",
            UnknownUnit(_) => "COMBAT_UNKNOWN_UNIT",
            UnknownAssignment(_) => "COMBAT_UNKNOWN_ASSIGNMENT",
            UnknownDamage(_) => "COMBAT_UNKNOWN_DAMAGE",
            InvalidAmount => "COMBAT_INVALID_AMOUNT",
            PoolNotConserved => "COMBAT_POOL_NOT_CONSERVED",
            PhaseRegressed { .. } => "COMBAT_PHASE_REGRESSED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Element;

    #[test]
    fn pool_errors_map_to_taxonomy() {
        let bucket = PoolBucket::melee(Element::Ice);
        let error = CombatError::from(PoolError::Insufficient {
            bucket,
            requested: 4,
            available: 1,
        });

        assert_eq!(error.error_code(), "COMBAT_INSUFFICIENT_POOL");
        assert!(error.severity().is_recoverable());
        assert_eq!(CombatError::from(PoolError::ZeroAmount), CombatError::InvalidAmount);
    }

    #[test]
    fn invariant_failures_are_internal() {
        assert!(CombatError::PoolNotConserved.severity().is_internal());
        assert!(!CombatError::UnknownEnemy(EnemyInstanceId(0)).severity().is_recoverable());
    }
}
