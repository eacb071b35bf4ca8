//! Phase sequencing: start, advance, withdraw.
//!
//! Phases only move forward. Entering `Block` draws summoned enemies,
//! leaving it queues unblocked attacks as damage, and entering `Attack`
//! dismisses the summoned enemies again.

use crate::combat::Hit;
use crate::enemy::Abilities;
use crate::env::CombatEnv;
use crate::events::CombatEvent;
use crate::state::{CombatOutcome, CombatPhase, CombatState, DamageAssignment, EnemyInstance};

use super::{
    CombatError, CommandTransition, PhaseRule, Resolution, check_invariants, require_active,
};

fn set_phase(state: &mut CombatState, to: CombatPhase) {
    let from = state.phase;
    state.phase = to;
    state.events.push(CombatEvent::CombatPhaseChanged { from, to });
}

/// Ends the combat with `outcome`.
pub(super) fn finish(state: &mut CombatState, outcome: CombatOutcome) {
    set_phase(state, CombatPhase::Resolved);
    state.outcome = Some(outcome);
    state.events.push(CombatEvent::CombatEnded {
        outcome,
        fame: state.fame,
    });
}

/// Each undefeated summoner draws its summoned enemy, which attacks in its place.
fn summon(state: &mut CombatState) {
    let summoners: Vec<_> = state
        .enemies
        .iter()
        .filter(|enemy| enemy.is_present() && !enemy.is_summoned())
        .filter(|enemy| enemy.abilities().contains(Abilities::SUMMON))
        .filter_map(|enemy| enemy.definition.summons.clone().map(|kind| (enemy.id, kind)))
        .collect();

    for (summoner, kind) in summoners {
        let Some(definition) = state.summon_definition(&kind).cloned() else {
            continue;
        };
        let summoned = state.next_enemy_id();
        state
            .enemies
            .push(EnemyInstance::summoned(summoned, definition, summoner));
        if let Some(enemy) = state.enemy_mut(summoner) {
            enemy.stand_in = Some(summoned);
        }
        state.events.push(CombatEvent::EnemySummoned {
            summoner,
            summoned,
            kind,
        });
    }
}

/// Queues every unblocked attack of a present enemy as damage.
fn queue_damage(state: &mut CombatState) {
    let entries: Vec<_> = state
        .enemies
        .iter()
        .filter(|enemy| enemy.is_present() && !enemy.attacks_delegated())
        .flat_map(|enemy| {
            enemy
                .slots
                .iter()
                .enumerate()
                .filter(|(_, slot)| !slot.blocked && slot.value() > 0)
                .map(move |(attack_index, slot)| DamageAssignment {
                    enemy: enemy.id,
                    attack_index,
                    hit: Hit {
                        damage: slot.value(),
                        element: slot.attack.element,
                        abilities: enemy.abilities(),
                    },
                    target: None,
                })
        })
        .collect();
    state.damage.extend(entries);
}

fn enter_attack(state: &mut CombatState) {
    let mut dismissed = Vec::new();
    for enemy in state
        .enemies
        .iter_mut()
        .filter(|enemy| enemy.is_summoned() && !enemy.dismissed)
    {
        enemy.dismissed = true;
        dismissed.push(enemy.id);
    }
    for enemy in dismissed {
        state.events.push(CombatEvent::EnemyDismissed { enemy });
    }
    set_phase(state, CombatPhase::Attack);
}

/// Reveals the enemies and opens the ranged and siege phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StartCombat;

impl CommandTransition for StartCombat {
    type Error = CombatError;
    type Result = CombatPhase;

    fn pre_validate(&self, state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        if state.phase == CombatPhase::NotStarted {
            Ok(())
        } else {
            Err(CombatError::AlreadyResolved(Resolution::CombatStarted))
        }
    }

    fn apply(&self, state: &mut CombatState, _env: &CombatEnv<'_>) -> Result<CombatPhase, Self::Error> {
        for enemy in &mut state.enemies {
            enemy.revealed = true;
        }
        state.events.push(CombatEvent::CombatStarted {
            trigger: state.trigger,
            enemies: state.enemies.iter().map(|enemy| enemy.id).collect(),
        });
        set_phase(state, CombatPhase::RangedAndSiege);
        Ok(state.phase)
    }
}

/// Ends the current phase once nothing is left open in it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdvancePhase;

impl CommandTransition for AdvancePhase {
    type Error = CombatError;
    type Result = CombatPhase;

    fn pre_validate(&self, state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        require_active(state)?;
        let open = state.open_assignments();
        if open > 0 {
            return Err(CombatError::phase(state.phase, PhaseRule::OpenAssignments(open)));
        }
        let pending = state.pending_damage().count();
        if pending > 0 {
            return Err(CombatError::phase(state.phase, PhaseRule::PendingDamage(pending)));
        }
        Ok(())
    }

    fn apply(&self, state: &mut CombatState, _env: &CombatEnv<'_>) -> Result<CombatPhase, Self::Error> {
        if state.all_defeated() {
            finish(state, CombatOutcome::Victory);
            return Ok(state.phase);
        }

        match state.phase {
            CombatPhase::RangedAndSiege => {
                set_phase(state, CombatPhase::Block);
                summon(state);
            }
            CombatPhase::Block => {
                queue_damage(state);
                if state.pending_damage().next().is_some() {
                    set_phase(state, CombatPhase::AssignDamage);
                } else {
                    enter_attack(state);
                }
            }
            CombatPhase::AssignDamage => enter_attack(state),
            CombatPhase::Attack => finish(state, CombatOutcome::PartialSurvival),
            CombatPhase::NotStarted | CombatPhase::Resolved => {
                return Err(CombatError::phase(state.phase, PhaseRule::Inactive));
            }
        }
        Ok(state.phase)
    }

    fn post_validate(&self, state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        check_invariants(state)
    }
}

/// Voluntary retreat, ending the combat with partial survival.
///
/// Retreating after every declared enemy fell still counts as a victory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Withdraw;

impl CommandTransition for Withdraw {
    type Error = CombatError;
    type Result = CombatPhase;

    fn pre_validate(&self, state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        require_active(state)?;
        if !state.trigger.permits_withdrawal() {
            return Err(CombatError::phase(state.phase, PhaseRule::WithdrawalRefused));
        }
        let pending = state.pending_damage().count();
        if pending > 0 {
            return Err(CombatError::phase(state.phase, PhaseRule::PendingDamage(pending)));
        }
        Ok(())
    }

    fn apply(&self, state: &mut CombatState, _env: &CombatEnv<'_>) -> Result<CombatPhase, Self::Error> {
        let outcome = if state.all_defeated() {
            CombatOutcome::Victory
        } else {
            CombatOutcome::PartialSurvival
        };
        finish(state, outcome);
        Ok(state.phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::FlatWoundRules;
    use crate::config::CombatConfig;
    use crate::enemy::EnemyDefinition;
    use crate::state::CombatTrigger;
    use crate::types::EnemyInstanceId;

    fn attack_phase(defeated: bool) -> CombatState {
        let mut enemy = EnemyInstance::new(EnemyInstanceId(0), EnemyDefinition::new("orc", 3, 4, 2));
        enemy.defeated = defeated;
        let mut state = CombatState::new(CombatTrigger::Default, 1, vec![enemy], vec![], vec![]);
        state.phase = CombatPhase::Attack;
        state
    }

    #[test]
    fn withdrawing_with_survivors_is_partial() {
        let mut state = attack_phase(false);
        let config = CombatConfig::default();
        let env = CombatEnv::new(&config, &FlatWoundRules);

        Withdraw.pre_validate(&state, &env).unwrap();
        Withdraw.apply(&mut state, &env).unwrap();
        assert_eq!(state.outcome, Some(CombatOutcome::PartialSurvival));
    }

    #[test]
    fn withdrawing_after_every_defeat_is_a_victory() {
        let mut state = attack_phase(true);
        let config = CombatConfig::default();
        let env = CombatEnv::new(&config, &FlatWoundRules);

        Withdraw.pre_validate(&state, &env).unwrap();
        Withdraw.apply(&mut state, &env).unwrap();
        assert_eq!(state.phase, CombatPhase::Resolved);
        assert_eq!(state.outcome, Some(CombatOutcome::Victory));
    }
}
