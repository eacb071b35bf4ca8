//! Threshold and legality rules derived from enemy abilities.

use crate::enemy::Abilities;
use crate::state::CombatPhase;
use crate::types::AttackType;

/// Whether attack contributions are restricted to siege for this enemy.
///
/// `UNFORTIFIED` always cancels `FORTIFIED`.
pub fn is_fortified(abilities: Abilities) -> bool {
    abilities.contains(Abilities::FORTIFIED) && !abilities.contains(Abilities::UNFORTIFIED)
}

/// Block needed to stop an attack of `attack_value`.
pub fn required_block(abilities: Abilities, attack_value: u32) -> u32 {
    if abilities.contains(Abilities::SWIFT) {
        attack_value.saturating_mul(2)
    } else {
        attack_value
    }
}

/// Result of checking a contribution type against phase and fortification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Eligibility {
    Eligible,
    /// The phase does not accept attack assignments at all.
    WrongPhase,
    /// Melee strength during the ranged and siege phase.
    WrongType,
    /// Non-siege strength against a fortified enemy during the ranged and siege phase.
    Fortified,
}

/// Checks whether an attack contribution of `kind` may be assigned to an
/// enemy with `abilities` in `phase`.
///
/// Fortification only gates the ranged and siege phase. In the attack
/// phase, leftover ranged and siege strength counts as melee.
pub fn attack_eligibility(phase: CombatPhase, kind: AttackType, abilities: Abilities) -> Eligibility {
    match phase {
        CombatPhase::RangedAndSiege => match kind {
            AttackType::Melee => Eligibility::WrongType,
            AttackType::Ranged if is_fortified(abilities) => Eligibility::Fortified,
            AttackType::Ranged | AttackType::Siege => Eligibility::Eligible,
        },
        CombatPhase::Attack => Eligibility::Eligible,
        CombatPhase::NotStarted
        | CombatPhase::Block
        | CombatPhase::AssignDamage
        | CombatPhase::Resolved => Eligibility::WrongPhase,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swift_doubles_required_block() {
        assert_eq!(required_block(Abilities::SWIFT, 4), 8);
        assert_eq!(required_block(Abilities::empty(), 4), 4);
        assert_eq!(required_block(Abilities::SWIFT | Abilities::BRUTAL, 0), 0);
    }

    #[test]
    fn unfortified_wins_over_fortified() {
        assert!(is_fortified(Abilities::FORTIFIED));
        assert!(!is_fortified(Abilities::FORTIFIED | Abilities::UNFORTIFIED));
        assert!(!is_fortified(Abilities::UNFORTIFIED));
    }

    #[test]
    fn fortification_only_gates_the_ranged_phase() {
        let fortified = Abilities::FORTIFIED;

        assert_eq!(
            attack_eligibility(CombatPhase::RangedAndSiege, AttackType::Ranged, fortified),
            Eligibility::Fortified
        );
        assert_eq!(
            attack_eligibility(CombatPhase::RangedAndSiege, AttackType::Siege, fortified),
            Eligibility::Eligible
        );
        assert_eq!(
            attack_eligibility(CombatPhase::Attack, AttackType::Ranged, fortified),
            Eligibility::Eligible
        );
        assert_eq!(
            attack_eligibility(CombatPhase::RangedAndSiege, AttackType::Melee, Abilities::empty()),
            Eligibility::WrongType
        );
        assert_eq!(
            attack_eligibility(CombatPhase::Block, AttackType::Melee, Abilities::empty()),
            Eligibility::WrongPhase
        );
    }
}
