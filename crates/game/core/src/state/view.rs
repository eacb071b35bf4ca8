//! Read-only query surface for UI and AI layers.
//!
//! Views carry everything needed to decide the next legal command without
//! re-implementing the ability resolver.

use super::{CombatState, EnemyInstance};
use crate::enemy::Abilities;
use crate::types::{Element, EnemyInstanceId, EnemyTypeId};

/// Block status of one attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackView {
    pub index: usize,
    pub element: Element,
    /// Value after cumbersome reductions.
    pub value: u32,
    pub required_block: u32,
    /// Effective block still needed.
    pub remaining_block: u32,
    pub is_blocked: bool,
    /// A summoned stand-in attacks instead; this attack cannot be blocked.
    pub delegated: bool,
}

/// Status of one enemy.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyView {
    pub id: EnemyInstanceId,
    pub kind: EnemyTypeId,
    pub armor: u32,
    /// Effective attack still needed to defeat the enemy.
    pub remaining_attack: u32,
    pub abilities: Abilities,
    pub attacks: Vec<AttackView>,
    pub is_blocked: bool,
    pub is_defeated: bool,
    pub summoned_by: Option<EnemyInstanceId>,
    pub dismissed: bool,
}

impl EnemyView {
    pub(super) fn new(state: &CombatState, enemy: &EnemyInstance) -> Self {
        let remaining_attack = if enemy.defeated {
            0
        } else {
            state
                .attack(enemy.id)
                .map_or(enemy.armor(), |assignment| assignment.remaining())
        };

        let attacks = enemy
            .slots
            .iter()
            .enumerate()
            .map(|(index, slot)| {
                let required_block = enemy.required_block(index).unwrap_or(0);
                let remaining_block = if slot.blocked {
                    0
                } else {
                    state
                        .block(enemy.id, index)
                        .map_or(required_block, |block| block.remaining())
                };
                AttackView {
                    index,
                    element: slot.attack.element,
                    value: slot.value(),
                    required_block,
                    remaining_block,
                    is_blocked: slot.blocked,
                    delegated: enemy.attacks_delegated(),
                }
            })
            .collect();

        Self {
            id: enemy.id,
            kind: enemy.definition.id.clone(),
            armor: enemy.armor(),
            remaining_attack,
            abilities: enemy.abilities(),
            attacks,
            is_blocked: enemy.is_blocked(),
            is_defeated: enemy.defeated,
            summoned_by: enemy.summoned_by,
            dismissed: enemy.dismissed,
        }
    }
}
