//! Per-instance enemy state.

use arrayvec::ArrayVec;

use crate::combat::required_block;
use crate::config::CombatConfig;
use crate::enemy::{Abilities, EnemyAttack, EnemyDefinition};
use crate::types::EnemyInstanceId;

/// State of one attack on an enemy token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackSlot {
    pub attack: EnemyAttack,
    /// Cumbersome reduction applied during the block phase.
    pub reduction: u32,
    pub blocked: bool,
}

impl AttackSlot {
    pub fn new(attack: EnemyAttack) -> Self {
        Self {
            attack,
            reduction: 0,
            blocked: false,
        }
    }

    /// Attack value after reductions.
    pub fn value(&self) -> u32 {
        self.attack.value.saturating_sub(self.reduction)
    }
}

/// One enemy token participating in a combat.
///
/// Armor is a threshold copied from the definition and never changes.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyInstance {
    pub id: EnemyInstanceId,
    pub definition: EnemyDefinition,
    pub revealed: bool,
    pub slots: ArrayVec<AttackSlot, { CombatConfig::MAX_ATTACKS_PER_ENEMY }>,
    pub defeated: bool,
    /// Summoner that drew this instance; `None` for declared enemies.
    pub summoned_by: Option<EnemyInstanceId>,
    /// Instance currently attacking in this summoner's place.
    pub stand_in: Option<EnemyInstanceId>,
    /// Summoned instances leave the combat when the attack phase begins.
    pub dismissed: bool,
}

impl EnemyInstance {
    pub fn new(id: EnemyInstanceId, definition: EnemyDefinition) -> Self {
        let slots = definition.attacks.iter().copied().map(AttackSlot::new).collect();
        Self {
            id,
            definition,
            revealed: false,
            slots,
            defeated: false,
            summoned_by: None,
            stand_in: None,
            dismissed: false,
        }
    }

    /// A revealed instance drawn by `summoner`.
    pub fn summoned(id: EnemyInstanceId, definition: EnemyDefinition, summoner: EnemyInstanceId) -> Self {
        let mut instance = Self::new(id, definition);
        instance.revealed = true;
        instance.summoned_by = Some(summoner);
        instance
    }

    pub fn abilities(&self) -> Abilities {
        self.definition.abilities
    }

    pub fn armor(&self) -> u32 {
        self.definition.armor
    }

    pub fn fame(&self) -> u32 {
        self.definition.fame
    }

    pub fn is_summoned(&self) -> bool {
        self.summoned_by.is_some()
    }

    /// True while a stand-in attacks in this summoner's place.
    pub fn attacks_delegated(&self) -> bool {
        self.stand_in.is_some()
    }

    /// Still takes part in the combat: neither defeated nor dismissed.
    pub fn is_present(&self) -> bool {
        !self.defeated && !self.dismissed
    }

    /// Block required for one attack, given swift and reductions.
    pub fn required_block(&self, attack_index: usize) -> Option<u32> {
        self.slots
            .get(attack_index)
            .map(|slot| required_block(self.abilities(), slot.value()))
    }

    /// True when every attack is blocked.
    pub fn is_blocked(&self) -> bool {
        self.slots.iter().all(|slot| slot.blocked)
    }
}
