//! Hero and unit state: the targets of unblocked attacks.

use crate::combat::HeroWounds;
use crate::types::UnitId;

/// Wound bookkeeping for the hero during one combat.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeroState {
    /// Wounds taken into hand; compared against the knockout threshold.
    pub wounds_to_hand: u32,
    /// Extra wounds put into the discard pile by poison.
    pub wounds_to_discard: u32,
    /// Set by paralyze: all non-wound cards must be discarded from hand.
    pub discard_non_wound_cards: bool,
    pub knocked_out: bool,
}

impl HeroState {
    pub fn take(&mut self, wounds: HeroWounds) {
        self.wounds_to_hand += wounds.to_hand;
        self.wounds_to_discard += wounds.to_discard;
        self.discard_non_wound_cards |= wounds.discard_non_wound_cards;
    }
}

/// Condition of a unit; only moves forward.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum UnitCondition {
    #[default]
    Ready,
    Wounded,
    Destroyed,
}

/// A unit declared into the combat.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitSpec {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub condition: UnitCondition,
}

impl UnitSpec {
    pub fn ready(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            condition: UnitCondition::Ready,
        }
    }

    pub fn wounded(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            condition: UnitCondition::Wounded,
        }
    }
}

/// One unit taking part in a combat.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitInstance {
    pub id: UnitId,
    pub name: String,
    pub condition: UnitCondition,
}

impl UnitInstance {
    pub fn new(id: UnitId, spec: UnitSpec) -> Self {
        Self {
            id,
            name: spec.name,
            condition: spec.condition,
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.condition == UnitCondition::Destroyed
    }
}
