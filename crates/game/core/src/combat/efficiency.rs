//! Elemental efficiency of block and attack contributions.
//!
//! Inefficient strength is summed first and halved once (integer floor), so
//! two inefficient contributions of 3 count as 3, not 2.

use crate::enemy::Resistances;
use crate::types::Element;

/// Whether a contribution counts at full or half value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Efficiency {
    Full,
    Halved,
}

/// Efficiency of block of `block` element against an attack of `attack` element.
///
/// Physical attacks are fully blocked by anything; cold-fire block is fully
/// efficient against everything; otherwise elements must match.
pub fn block_efficiency(block: Element, attack: Element) -> Efficiency {
    if attack == Element::Physical || block == Element::ColdFire || block == attack {
        Efficiency::Full
    } else {
        Efficiency::Halved
    }
}

/// Efficiency of a player attack of `element` against an enemy's resistances.
pub fn attack_efficiency(element: Element, resistances: Resistances) -> Efficiency {
    if resistances.resists(element) {
        Efficiency::Halved
    } else {
        Efficiency::Full
    }
}

/// Running total of full-value and halved strength bound to one target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tally {
    pub full: u32,
    pub halved: u32,
}

impl Tally {
    /// Effective value: full strength plus half the halved strength.
    pub fn value(&self) -> u32 {
        self.full + self.halved / 2
    }

    /// Raw strength bound so far, regardless of efficiency.
    pub fn raw(&self) -> u32 {
        self.full + self.halved
    }

    pub fn add(&mut self, efficiency: Efficiency, amount: u32) {
        match efficiency {
            Efficiency::Full => self.full += amount,
            Efficiency::Halved => self.halved += amount,
        }
    }

    pub fn remove(&mut self, efficiency: Efficiency, amount: u32) {
        match efficiency {
            Efficiency::Full => self.full -= amount,
            Efficiency::Halved => self.halved -= amount,
        }
    }

    /// Effective strength still missing to reach `target`.
    pub fn remaining(&self, target: u32) -> u32 {
        target.saturating_sub(self.value())
    }

    /// Smallest raw amount of the given efficiency that reaches `target`.
    pub fn raw_needed(&self, target: u32, efficiency: Efficiency) -> u32 {
        if self.value() >= target {
            return 0;
        }
        match efficiency {
            Efficiency::Full => target - self.value(),
            Efficiency::Halved => {
                let missing = target - self.full;
                missing.saturating_mul(2).saturating_sub(self.halved)
            }
        }
    }
}
