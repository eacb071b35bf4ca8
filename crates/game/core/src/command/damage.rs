//! Damage distribution: routing unblocked attacks to the hero or units.

use crate::env::CombatEnv;
use crate::events::{CombatEvent, DamageOutcome};
use crate::state::{CombatOutcome, CombatPhase, CombatState, DamageTarget};

use super::phase::finish;
use super::{CombatError, CommandTransition, Resolution, check_invariants, require_phase};

/// Assigns one entry of the damage queue to a target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssignDamage {
    /// Index into the damage queue.
    pub entry: usize,
    pub target: DamageTarget,
}

impl AssignDamage {
    pub fn new(entry: usize, target: DamageTarget) -> Self {
        Self { entry, target }
    }

    pub fn to_hero(entry: usize) -> Self {
        Self::new(entry, DamageTarget::Hero)
    }
}

impl CommandTransition for AssignDamage {
    type Error = CombatError;
    type Result = DamageOutcome;

    fn pre_validate(&self, state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        require_phase(state, CombatPhase::AssignDamage)?;
        let entry = state
            .damage
            .get(self.entry)
            .ok_or(CombatError::UnknownDamage(self.entry))?;
        if entry.target.is_some() {
            return Err(CombatError::AlreadyResolved(Resolution::DamageAssigned(
                self.entry,
            )));
        }

        if let DamageTarget::Unit(id) = self.target {
            let unit = state.unit(id).ok_or(CombatError::UnknownUnit(id))?;
            if unit.is_destroyed() {
                return Err(CombatError::AlreadyResolved(Resolution::UnitDestroyed(id)));
            }
        }
        Ok(())
    }

    fn apply(&self, state: &mut CombatState, env: &CombatEnv<'_>) -> Result<DamageOutcome, Self::Error> {
        let entry = state
            .damage
            .get_mut(self.entry)
            .ok_or(CombatError::UnknownDamage(self.entry))?;
        entry.target = Some(self.target);
        let entry = *entry;

        let outcome = match self.target {
            DamageTarget::Hero => {
                let wounds = env.wounds().hero_wounds(&entry.hit);
                state.hero.take(wounds);
                DamageOutcome::Hero(wounds)
            }
            DamageTarget::Unit(id) => {
                let unit = state.unit_mut(id).ok_or(CombatError::UnknownUnit(id))?;
                let before = unit.condition;
                unit.condition = env.wounds().unit_condition(&entry.hit, before);
                DamageOutcome::Unit {
                    unit: id,
                    before,
                    after: unit.condition,
                }
            }
        };

        state.events.push(CombatEvent::DamageAssigned {
            enemy: entry.enemy,
            attack_index: entry.attack_index,
            damage: entry.hit.damage,
            target: self.target,
            outcome,
        });

        let knocked_out = matches!(outcome, DamageOutcome::Hero(_))
            && !state.hero.knocked_out
            && state.hero.wounds_to_hand >= env.config().knockout_threshold;
        if knocked_out {
            state.hero.knocked_out = true;
            state.events.push(CombatEvent::HeroKnockedOut {
                wounds: state.hero.wounds_to_hand,
            });
            finish(state, CombatOutcome::KnockedOut);
        }

        Ok(outcome)
    }

    fn post_validate(&self, state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        check_invariants(state)
    }
}
