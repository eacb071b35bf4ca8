//! Assignment bookkeeping: block, attack and damage.

use crate::combat::{Efficiency, Hit, Tally};
use crate::pool::PoolBucket;
use crate::types::{AssignmentId, EnemyInstanceId, UnitId};

use super::CombatPhase;

/// Block bound to one attack of one enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockAssignment {
    pub enemy: EnemyInstanceId,
    pub attack_index: usize,
    pub tally: Tally,
    pub required: u32,
}

impl BlockAssignment {
    pub fn new(enemy: EnemyInstanceId, attack_index: usize, required: u32) -> Self {
        Self {
            enemy,
            attack_index,
            tally: Tally::default(),
            required,
        }
    }

    /// Effective block accumulated so far.
    pub fn accumulated(&self) -> u32 {
        self.tally.value()
    }

    pub fn remaining(&self) -> u32 {
        self.tally.remaining(self.required)
    }

    pub fn is_complete(&self) -> bool {
        self.accumulated() >= self.required
    }

    /// Holds strength without being complete; blocks phase advance.
    pub fn is_open(&self) -> bool {
        !self.is_complete() && self.tally.raw() > 0
    }
}

/// Attack bound to one enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackAssignment {
    pub enemy: EnemyInstanceId,
    pub tally: Tally,
    pub armor: u32,
}

impl AttackAssignment {
    pub fn new(enemy: EnemyInstanceId, armor: u32) -> Self {
        Self {
            enemy,
            tally: Tally::default(),
            armor,
        }
    }

    pub fn accumulated(&self) -> u32 {
        self.tally.value()
    }

    pub fn remaining(&self) -> u32 {
        self.tally.remaining(self.armor)
    }

    pub fn is_complete(&self) -> bool {
        self.accumulated() >= self.armor
    }

    pub fn is_open(&self) -> bool {
        !self.is_complete() && self.tally.raw() > 0
    }
}

/// What an assignment record was bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AssignmentTarget {
    Block {
        enemy: EnemyInstanceId,
        attack_index: usize,
    },
    Attack {
        enemy: EnemyInstanceId,
    },
}

impl AssignmentTarget {
    pub fn enemy(&self) -> EnemyInstanceId {
        match *self {
            Self::Block { enemy, .. } | Self::Attack { enemy } => enemy,
        }
    }
}

/// Lifecycle of one assignment record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AssignmentStatus {
    Active,
    /// Strength was returned to the pool.
    Reversed,
    /// Strength stays spent; the target's tally was reset.
    Abandoned,
}

/// One successful assignment call, kept so it can be reversed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssignmentRecord {
    pub id: AssignmentId,
    /// Phase the assignment was made in; unassignment is only allowed there.
    pub phase: CombatPhase,
    pub target: AssignmentTarget,
    pub bucket: PoolBucket,
    pub amount: u32,
    pub efficiency: Efficiency,
    pub status: AssignmentStatus,
}

impl AssignmentRecord {
    pub fn is_active(&self) -> bool {
        self.status == AssignmentStatus::Active
    }
}

/// Who absorbs an unblocked attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageTarget {
    Hero,
    Unit(UnitId),
}

/// One unblocked attack waiting to be assigned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageAssignment {
    pub enemy: EnemyInstanceId,
    pub attack_index: usize,
    pub hit: Hit,
    pub target: Option<DamageTarget>,
}

impl DamageAssignment {
    /// Damage still waiting for a target; zero once assigned.
    pub fn unassigned_damage(&self) -> u32 {
        match self.target {
            Some(_) => 0,
            None => self.hit.damage,
        }
    }
}
