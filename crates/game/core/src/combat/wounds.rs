//! Wound conversion: how an unblocked attack turns into wounds.
//!
//! The engine only decides *who* takes an attack; how many wounds that
//! means is delegated to a [`WoundRules`] implementation. Poison, paralyze
//! and brutal are applied here as explicit hooks so each one can be tested
//! on its own.

use crate::config::{CombatConfig, WoundRulesKind};
use crate::enemy::Abilities;
use crate::state::UnitCondition;
use crate::types::Element;

/// An unblocked attack being assigned to a target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hit {
    /// Declared attack value, after cumbersome reductions.
    pub damage: u32,
    pub element: Element,
    /// Abilities of the attacking enemy.
    pub abilities: Abilities,
}

impl Hit {
    /// Damage used for wound conversion; brutal doubles it.
    pub fn effective_damage(&self) -> u32 {
        if self.abilities.contains(Abilities::BRUTAL) {
            self.damage.saturating_mul(2)
        } else {
            self.damage
        }
    }

    pub fn is_poison(&self) -> bool {
        self.abilities.contains(Abilities::POISON)
    }

    pub fn is_paralyze(&self) -> bool {
        self.abilities.contains(Abilities::PARALYZE)
    }
}

/// Wounds the hero takes from one hit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeroWounds {
    /// Wounds put into the hand; these count toward knockout.
    pub to_hand: u32,
    /// Extra wounds put into the discard pile (poison).
    pub to_discard: u32,
    /// Paralyze: the hero must discard all non-wound cards from hand.
    pub discard_non_wound_cards: bool,
}

/// Wound conversion rules.
pub trait WoundRules {
    /// Number of wounds the hero takes from `hit`.
    fn hero_wounds(&self, hit: &Hit) -> HeroWounds;

    /// Condition of a unit after absorbing `hit` in condition `before`.
    ///
    /// Default: poison and paralyze destroy outright; otherwise a ready unit
    /// is wounded and a wounded unit is destroyed.
    fn unit_condition(&self, hit: &Hit, before: UnitCondition) -> UnitCondition {
        if hit.is_poison() || hit.is_paralyze() {
            return UnitCondition::Destroyed;
        }
        match before {
            UnitCondition::Ready => UnitCondition::Wounded,
            UnitCondition::Wounded | UnitCondition::Destroyed => UnitCondition::Destroyed,
        }
    }
}

fn escalate(hit: &Hit, to_hand: u32) -> HeroWounds {
    HeroWounds {
        to_hand,
        to_discard: if hit.is_poison() { to_hand } else { 0 },
        discard_non_wound_cards: hit.is_paralyze(),
    }
}

/// One wound per unblocked attack regardless of its numeric value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlatWoundRules;

impl WoundRules for FlatWoundRules {
    fn hero_wounds(&self, hit: &Hit) -> HeroWounds {
        escalate(hit, 1)
    }
}

/// Wounds equal to `ceil(damage / hero_armor)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArmorWoundRules {
    pub hero_armor: u32,
}

impl ArmorWoundRules {
    pub fn new(hero_armor: u32) -> Self {
        Self {
            hero_armor: hero_armor.max(1),
        }
    }
}

impl WoundRules for ArmorWoundRules {
    fn hero_wounds(&self, hit: &Hit) -> HeroWounds {
        let damage = hit.effective_damage();
        escalate(hit, damage.div_ceil(self.hero_armor.max(1)))
    }
}

/// Builds the rules selected by `config`.
pub fn wound_rules_for(config: &CombatConfig) -> Box<dyn WoundRules + Send + Sync> {
    match config.wound_rules {
        WoundRulesKind::Flat => Box::new(FlatWoundRules),
        WoundRulesKind::Armor => Box::new(ArmorWoundRules::new(config.hero_armor)),
    }
}
