//! Domain events emitted by successful commands.
//!
//! The log is append-only and ordered. Rejected commands emit nothing, so
//! the log is a faithful projection of every accepted mutation and can be
//! rendered as narration without consulting the state.

use std::fmt;

use crate::combat::{Efficiency, HeroWounds};
use crate::pool::PoolBucket;
use crate::state::{CombatOutcome, CombatPhase, CombatTrigger, DamageTarget, UnitCondition};
use crate::types::{AssignmentId, EnemyInstanceId, EnemyTypeId, UnitId};

/// What absorbing one unblocked attack did to its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageOutcome {
    Hero(HeroWounds),
    Unit {
        unit: UnitId,
        before: UnitCondition,
        after: UnitCondition,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatEvent {
    CombatStarted {
        trigger: CombatTrigger,
        enemies: Vec<EnemyInstanceId>,
    },
    CombatPhaseChanged {
        from: CombatPhase,
        to: CombatPhase,
    },
    StrengthContributed {
        bucket: PoolBucket,
        amount: u32,
        balance: u32,
    },
    BlockAssigned {
        assignment: AssignmentId,
        enemy: EnemyInstanceId,
        attack_index: usize,
        bucket: PoolBucket,
        amount: u32,
        efficiency: Efficiency,
        accumulated: u32,
        required: u32,
    },
    AttackBlocked {
        enemy: EnemyInstanceId,
        attack_index: usize,
    },
    BlockUnassigned {
        assignment: AssignmentId,
        enemy: EnemyInstanceId,
        attack_index: usize,
        amount: u32,
    },
    BlockAbandoned {
        enemy: EnemyInstanceId,
        attack_index: usize,
        spent: u32,
    },
    AttackAssigned {
        assignment: AssignmentId,
        enemy: EnemyInstanceId,
        bucket: PoolBucket,
        amount: u32,
        efficiency: Efficiency,
        accumulated: u32,
        armor: u32,
    },
    AttackUnassigned {
        assignment: AssignmentId,
        enemy: EnemyInstanceId,
        amount: u32,
    },
    AttackAbandoned {
        enemy: EnemyInstanceId,
        spent: u32,
    },
    EnemyDefeated {
        enemy: EnemyInstanceId,
        fame: u32,
    },
    EnemySummoned {
        summoner: EnemyInstanceId,
        summoned: EnemyInstanceId,
        kind: EnemyTypeId,
    },
    EnemyDismissed {
        enemy: EnemyInstanceId,
    },
    AttackReduced {
        enemy: EnemyInstanceId,
        attack_index: usize,
        by: u32,
        value: u32,
    },
    DamageAssigned {
        enemy: EnemyInstanceId,
        attack_index: usize,
        damage: u32,
        target: DamageTarget,
        outcome: DamageOutcome,
    },
    HeroKnockedOut {
        wounds: u32,
    },
    CombatEnded {
        outcome: CombatOutcome,
        fame: u32,
    },
}

impl CombatEvent {
    /// Stable snake_case name, used by log readers for filtering.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CombatStarted { .. } => "combat_started",
            Self::CombatPhaseChanged { .. } => "combat_phase_changed",
            Self::StrengthContributed { .. } => "strength_contributed",
            Self::BlockAssigned { .. } => "block_assigned",
            Self::AttackBlocked { .. } => "attack_blocked",
            Self::BlockUnassigned { .. } => "block_unassigned",
            Self::BlockAbandoned { .. } => "block_abandoned",
            Self::AttackAssigned { .. } => "attack_assigned",
            Self::AttackUnassigned { .. } => "attack_unassigned",
            Self::AttackAbandoned { .. } => "attack_abandoned",
            Self::EnemyDefeated { .. } => "enemy_defeated",
            Self::EnemySummoned { .. } => "enemy_summoned",
            Self::EnemyDismissed { .. } => "enemy_dismissed",
            Self::AttackReduced { .. } => "attack_reduced",
            Self::DamageAssigned { .. } => "damage_assigned",
            Self::HeroKnockedOut { .. } => "hero_knocked_out",
            Self::CombatEnded { .. } => "combat_ended",
        }
    }
}

impl fmt::Display for CombatEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CombatStarted { trigger, enemies } => {
                write!(f, "{trigger} combat started against {} enemies", enemies.len())
            }
            Self::CombatPhaseChanged { from, to } => write!(f, "phase {from} -> {to}"),
            Self::StrengthContributed {
                bucket,
                amount,
                balance,
            } => write!(f, "+{amount} {bucket} (pool {balance})"),
            Self::BlockAssigned {
                enemy,
                attack_index,
                amount,
                efficiency,
                accumulated,
                required,
                ..
            } => write!(
                f,
                "block {amount} ({efficiency:?}) on {enemy} attack {attack_index}: {accumulated}/{required}"
            ),
            Self::AttackBlocked {
                enemy,
                attack_index,
            } => write!(f, "{enemy} attack {attack_index} blocked"),
            Self::BlockUnassigned {
                assignment, amount, ..
            } => write!(f, "{assignment} unassigned, {amount} block returned"),
            Self::BlockAbandoned {
                enemy,
                attack_index,
                spent,
            } => write!(f, "block on {enemy} attack {attack_index} abandoned ({spent} spent)"),
            Self::AttackAssigned {
                enemy,
                amount,
                efficiency,
                accumulated,
                armor,
                ..
            } => write!(
                f,
                "attack {amount} ({efficiency:?}) on {enemy}: {accumulated}/{armor}"
            ),
            Self::AttackUnassigned {
                assignment, amount, ..
            } => write!(f, "{assignment} unassigned, {amount} attack returned"),
            Self::AttackAbandoned { enemy, spent } => {
                write!(f, "attack on {enemy} abandoned ({spent} spent)")
            }
            Self::EnemyDefeated { enemy, fame } => write!(f, "{enemy} defeated, +{fame} fame"),
            Self::EnemySummoned {
                summoner,
                summoned,
                kind,
            } => write!(f, "{summoner} summoned {kind} as {summoned}"),
            Self::EnemyDismissed { enemy } => write!(f, "{enemy} dismissed"),
            Self::AttackReduced {
                enemy,
                attack_index,
                by,
                value,
            } => write!(f, "{enemy} attack {attack_index} reduced by {by} to {value}"),
            Self::DamageAssigned {
                enemy,
                attack_index,
                damage,
                outcome,
                ..
            } => match outcome {
                DamageOutcome::Hero(wounds) => write!(
                    f,
                    "hero takes {damage} from {enemy} attack {attack_index}: {} wounds",
                    wounds.to_hand
                ),
                DamageOutcome::Unit {
                    unit,
                    before,
                    after,
                } => write!(
                    f,
                    "{unit} takes {damage} from {enemy} attack {attack_index}: {before} -> {after}"
                ),
            },
            Self::HeroKnockedOut { wounds } => write!(f, "hero knocked out with {wounds} wounds"),
            Self::CombatEnded { outcome, fame } => write!(f, "combat ended: {outcome}, {fame} fame"),
        }
    }
}

/// Ordered, append-only event log owned by the combat state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct EventLog {
    events: Vec<CombatEvent>,
}

impl EventLog {
    pub fn push(&mut self, event: CombatEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events appended at or after `position`.
    pub fn since(&self, position: usize) -> &[CombatEvent] {
        self.events.get(position..).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = &CombatEvent> {
        self.events.iter()
    }
}
