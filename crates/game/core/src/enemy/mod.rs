//! Static enemy definitions.
//!
//! Abilities and resistances are a closed set of tagged flags; everything an
//! enemy does differently is derived from these flags by the pure functions
//! in [`crate::combat`]. The enemy table stays purely data-driven.

mod registry;

pub use registry::{EnemyOracle, EnemyRegistry, RegistryError};

use arrayvec::ArrayVec;
use bitflags::bitflags;

use crate::config::CombatConfig;
use crate::types::{Element, EnemyTypeId};

bitflags! {
    /// Enemy abilities that modify how it is blocked, attacked or how its
    /// unblocked attacks wound.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(transparent))]
    pub struct Abilities: u16 {
        const FORTIFIED   = 1 << 0;
        const UNFORTIFIED = 1 << 1;
        const SWIFT       = 1 << 2;
        const BRUTAL      = 1 << 3;
        const POISON      = 1 << 4;
        const PARALYZE    = 1 << 5;
        const SUMMON      = 1 << 6;
        const CUMBERSOME  = 1 << 7;
    }
}

bitflags! {
    /// Elements the enemy resists; player attacks of these elements count half.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(transparent))]
    pub struct Resistances: u8 {
        const PHYSICAL = 1 << 0;
        const FIRE     = 1 << 1;
        const ICE      = 1 << 2;
    }
}

impl Resistances {
    /// Whether player attacks of `element` are halved against this set.
    ///
    /// Cold-fire is only resisted by enemies resisting both fire and ice.
    pub fn resists(self, element: Element) -> bool {
        match element {
            Element::Physical => self.contains(Self::PHYSICAL),
            Element::Fire => self.contains(Self::FIRE),
            Element::Ice => self.contains(Self::ICE),
            Element::ColdFire => self.contains(Self::FIRE | Self::ICE),
        }
    }
}

/// One attack printed on an enemy token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyAttack {
    pub value: u32,
    pub element: Element,
}

impl EnemyAttack {
    pub const fn new(value: u32, element: Element) -> Self {
        Self { value, element }
    }

    pub const fn physical(value: u32) -> Self {
        Self::new(value, Element::Physical)
    }
}

/// Attacks of one enemy, bounded by [`CombatConfig::MAX_ATTACKS_PER_ENEMY`].
pub type EnemyAttacks = ArrayVec<EnemyAttack, { CombatConfig::MAX_ATTACKS_PER_ENEMY }>;

/// Immutable definition of an enemy type.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyDefinition {
    pub id: EnemyTypeId,
    pub name: String,
    pub attacks: EnemyAttacks,
    pub armor: u32,
    pub fame: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub abilities: Abilities,
    #[cfg_attr(feature = "serde", serde(default))]
    pub resistances: Resistances,
    /// Enemy type drawn by the summon ability.
    #[cfg_attr(feature = "serde", serde(default))]
    pub summons: Option<EnemyTypeId>,
}

impl EnemyDefinition {
    /// Creates a definition with a single physical attack and no abilities.
    pub fn new(id: impl Into<String>, attack: u32, armor: u32, fame: u32) -> Self {
        let id = id.into();
        let mut attacks = EnemyAttacks::new();
        attacks.push(EnemyAttack::physical(attack));
        Self {
            name: id.clone(),
            id: EnemyTypeId(id),
            attacks,
            armor,
            fame,
            abilities: Abilities::empty(),
            resistances: Resistances::empty(),
            summons: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_abilities(mut self, abilities: Abilities) -> Self {
        self.abilities |= abilities;
        self
    }

    pub fn with_resistances(mut self, resistances: Resistances) -> Self {
        self.resistances |= resistances;
        self
    }

    /// Replaces the attack list. Attacks beyond the per-enemy capacity are dropped.
    pub fn with_attacks(mut self, attacks: impl IntoIterator<Item = EnemyAttack>) -> Self {
        self.attacks = attacks
            .into_iter()
            .take(CombatConfig::MAX_ATTACKS_PER_ENEMY)
            .collect();
        self
    }

    pub fn with_summons(mut self, summons: impl Into<String>) -> Self {
        self.abilities |= Abilities::SUMMON;
        self.summons = Some(EnemyTypeId(summons.into()));
        self
    }

    pub fn has(&self, ability: Abilities) -> bool {
        self.abilities.contains(ability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cold_fire_needs_both_resistances() {
        assert!(!Resistances::FIRE.resists(Element::ColdFire));
        assert!((Resistances::FIRE | Resistances::ICE).resists(Element::ColdFire));
        assert!(Resistances::PHYSICAL.resists(Element::Physical));
        assert!(!Resistances::PHYSICAL.resists(Element::Ice));
    }

    #[test]
    fn builder_accumulates_abilities() {
        let def = EnemyDefinition::new("guardsmen", 3, 7, 3)
            .with_abilities(Abilities::FORTIFIED)
            .with_summons("orc");

        assert!(def.has(Abilities::FORTIFIED | Abilities::SUMMON));
        assert_eq!(def.summons, Some(EnemyTypeId::from("orc")));
        assert_eq!(def.attacks.len(), 1);
    }
}
