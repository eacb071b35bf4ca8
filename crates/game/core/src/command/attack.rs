//! Attack assignment: binding ranged, siege or melee strength to one enemy.

use crate::combat::{Efficiency, Eligibility, attack_efficiency, attack_eligibility};
use crate::env::CombatEnv;
use crate::events::CombatEvent;
use crate::pool::PoolBucket;
use crate::state::{
    AssignmentRecord, AssignmentStatus, AssignmentTarget, CombatOutcome, CombatState, EnemyInstance,
};
use crate::types::{AssignmentId, AttackType, Element, EnemyInstanceId};

use super::phase::finish;
use super::{
    CombatError, CommandTransition, Ineligibility, PhaseRule, Resolution, check_invariants,
    live_enemy, require_active, require_amount,
};

fn eligible(state: &CombatState, enemy: &EnemyInstance, kind: AttackType) -> Result<(), CombatError> {
    match attack_eligibility(state.phase, kind, enemy.abilities()) {
        Eligibility::Eligible => Ok(()),
        Eligibility::WrongPhase => Err(CombatError::phase(state.phase, PhaseRule::AttackClosed)),
        Eligibility::WrongType => Err(CombatError::IneligibleContribution(
            Ineligibility::WrongType(kind),
        )),
        Eligibility::Fortified => Err(CombatError::IneligibleContribution(
            Ineligibility::Fortified,
        )),
    }
}

fn attack_phase_open(state: &CombatState) -> Result<(), CombatError> {
    match attack_eligibility(state.phase, AttackType::Melee, Default::default()) {
        Eligibility::WrongPhase => Err(CombatError::phase(state.phase, PhaseRule::AttackClosed)),
        _ => Ok(()),
    }
}

/// Binds pooled attack strength to one enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssignAttack {
    pub enemy: EnemyInstanceId,
    pub kind: AttackType,
    pub element: Element,
    pub amount: u32,
}

impl AssignAttack {
    pub fn new(enemy: EnemyInstanceId, kind: AttackType, element: Element, amount: u32) -> Self {
        Self {
            enemy,
            kind,
            element,
            amount,
        }
    }

    fn bucket(&self) -> PoolBucket {
        PoolBucket::new(self.kind, self.element)
    }

    fn efficiency(&self, enemy: &EnemyInstance) -> Efficiency {
        attack_efficiency(self.element, enemy.definition.resistances)
    }
}

impl CommandTransition for AssignAttack {
    type Error = CombatError;
    type Result = AssignmentId;

    fn pre_validate(&self, state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        attack_phase_open(state)?;
        require_amount(self.amount)?;
        let bucket = self.bucket();
        if !bucket.is_valid() {
            return Err(CombatError::IneligibleContribution(
                Ineligibility::InvalidBucket(bucket),
            ));
        }

        let enemy = live_enemy(state, self.enemy)?;
        eligible(state, enemy, self.kind)?;
        state.pool.check_available(bucket, self.amount)?;

        let tally = state
            .attack(self.enemy)
            .map(|attack| attack.tally)
            .unwrap_or_default();
        let needed = tally.raw_needed(enemy.armor(), self.efficiency(enemy));
        if self.amount > needed {
            return Err(CombatError::OverAssignment {
                requested: self.amount,
                needed,
            });
        }
        Ok(())
    }

    fn apply(&self, state: &mut CombatState, _env: &CombatEnv<'_>) -> Result<AssignmentId, Self::Error> {
        let enemy = state
            .enemy(self.enemy)
            .ok_or(CombatError::UnknownEnemy(self.enemy))?;
        let efficiency = self.efficiency(enemy);
        let armor = enemy.armor();
        let fame = if enemy.is_summoned() { 0 } else { enemy.fame() };
        let bucket = self.bucket();

        state.pool.consume(bucket, self.amount)?;

        let id = state.next_assignment_id();
        let attack = state.attack_entry(self.enemy, armor);
        attack.tally.add(efficiency, self.amount);
        let accumulated = attack.accumulated();
        let complete = attack.is_complete();

        state.ledger.push(AssignmentRecord {
            id,
            phase: state.phase,
            target: AssignmentTarget::Attack { enemy: self.enemy },
            bucket,
            amount: self.amount,
            efficiency,
            status: AssignmentStatus::Active,
        });
        state.events.push(CombatEvent::AttackAssigned {
            assignment: id,
            enemy: self.enemy,
            bucket,
            amount: self.amount,
            efficiency,
            accumulated,
            armor,
        });

        if complete {
            if let Some(enemy) = state.enemy_mut(self.enemy) {
                enemy.defeated = true;
            }
            state.fame += fame;
            state.events.push(CombatEvent::EnemyDefeated {
                enemy: self.enemy,
                fame,
            });
            if state.all_defeated() {
                finish(state, CombatOutcome::Victory);
            }
        }

        Ok(id)
    }

    fn post_validate(&self, state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        check_invariants(state)
    }
}

/// Returns an attack assignment's strength to the pool.
///
/// Defeat is final: once the enemy is defeated its assignments stay bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnassignAttack {
    pub assignment: AssignmentId,
}

impl UnassignAttack {
    pub fn new(assignment: AssignmentId) -> Self {
        Self { assignment }
    }
}

impl CommandTransition for UnassignAttack {
    type Error = CombatError;
    type Result = ();

    fn pre_validate(&self, state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        require_active(state)?;
        let record = state
            .record(self.assignment)
            .ok_or(CombatError::UnknownAssignment(self.assignment))?;
        let AssignmentTarget::Attack { enemy } = record.target else {
            return Err(CombatError::UnknownAssignment(self.assignment));
        };

        match record.status {
            AssignmentStatus::Active => {}
            AssignmentStatus::Reversed => {
                return Err(CombatError::AlreadyResolved(
                    Resolution::AssignmentReversed(self.assignment),
                ));
            }
            AssignmentStatus::Abandoned => {
                return Err(CombatError::AlreadyResolved(
                    Resolution::AssignmentAbandoned(self.assignment),
                ));
            }
        }
        if state.enemy(enemy).is_some_and(|instance| instance.defeated) {
            return Err(CombatError::AlreadyResolved(Resolution::EnemyDefeated(enemy)));
        }
        if record.phase != state.phase {
            return Err(CombatError::phase(
                state.phase,
                PhaseRule::PhaseEnded(record.phase),
            ));
        }
        Ok(())
    }

    fn apply(&self, state: &mut CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        let record = state
            .record_mut(self.assignment)
            .ok_or(CombatError::UnknownAssignment(self.assignment))?;
        record.status = AssignmentStatus::Reversed;
        let record = *record;
        let enemy = record.target.enemy();

        state.pool.refund(record.bucket, record.amount)?;
        if let Some(attack) = state.attack_mut(enemy) {
            attack.tally.remove(record.efficiency, record.amount);
        }

        state.events.push(CombatEvent::AttackUnassigned {
            assignment: self.assignment,
            enemy,
            amount: record.amount,
        });
        Ok(())
    }

    fn post_validate(&self, state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        check_invariants(state)
    }
}

/// Gives up an incomplete attack; the strength bound to it stays spent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbandonAttack {
    pub enemy: EnemyInstanceId,
}

impl AbandonAttack {
    pub fn new(enemy: EnemyInstanceId) -> Self {
        Self { enemy }
    }
}

impl CommandTransition for AbandonAttack {
    type Error = CombatError;
    type Result = ();

    fn pre_validate(&self, state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        attack_phase_open(state)?;
        live_enemy(state, self.enemy)?;
        match state.attack(self.enemy) {
            Some(attack) if attack.is_open() => Ok(()),
            _ => Err(CombatError::AlreadyResolved(Resolution::NothingAssigned)),
        }
    }

    fn apply(&self, state: &mut CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        let attack = state
            .attack_mut(self.enemy)
            .ok_or(CombatError::AlreadyResolved(Resolution::NothingAssigned))?;
        let spent = attack.tally.raw();
        attack.tally = Default::default();

        let target = AssignmentTarget::Attack { enemy: self.enemy };
        for record in state
            .ledger
            .iter_mut()
            .filter(|record| record.target == target && record.is_active())
        {
            record.status = AssignmentStatus::Abandoned;
        }

        state.events.push(CombatEvent::AttackAbandoned {
            enemy: self.enemy,
            spent,
        });
        Ok(())
    }

    fn post_validate(&self, state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        check_invariants(state)
    }
}
