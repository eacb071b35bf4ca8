//! Block assignment: binding melee strength to one enemy attack.

use crate::combat::{Efficiency, block_efficiency, required_block};
use crate::enemy::Abilities;
use crate::env::CombatEnv;
use crate::events::CombatEvent;
use crate::pool::PoolBucket;
use crate::state::{
    AssignmentRecord, AssignmentStatus, AssignmentTarget, CombatPhase, CombatState, EnemyInstance,
};
use crate::types::{AssignmentId, Element, EnemyInstanceId};

use super::{
    CombatError, CommandTransition, Ineligibility, PhaseRule, Resolution, check_invariants,
    live_enemy, require_active, require_amount, require_phase,
};

/// Looks up an attack that can still be blocked or reduced.
fn blockable(
    state: &CombatState,
    enemy: EnemyInstanceId,
    attack_index: usize,
) -> Result<&EnemyInstance, CombatError> {
    let instance = live_enemy(state, enemy)?;
    if instance.attacks_delegated() {
        return Err(CombatError::AlreadyResolved(Resolution::AttackDelegated(enemy)));
    }
    let slot = instance
        .slots
        .get(attack_index)
        .ok_or(CombatError::UnknownAttack {
            enemy,
            attack_index,
        })?;
    if slot.blocked {
        return Err(CombatError::AlreadyResolved(Resolution::AttackBlocked {
            enemy,
            attack_index,
        }));
    }
    Ok(instance)
}

/// Marks the attack blocked once its block entry is sufficient.
fn settle_block(state: &mut CombatState, enemy: EnemyInstanceId, attack_index: usize) {
    let complete = state
        .block(enemy, attack_index)
        .is_some_and(|block| block.is_complete());
    let Some(slot) = state
        .enemy_mut(enemy)
        .and_then(|instance| instance.slots.get_mut(attack_index))
    else {
        return;
    };
    let newly_blocked = complete && !slot.blocked;
    slot.blocked = complete;
    if newly_blocked {
        state.events.push(CombatEvent::AttackBlocked {
            enemy,
            attack_index,
        });
    }
}

/// Binds melee strength of one element to one enemy attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssignBlock {
    pub enemy: EnemyInstanceId,
    pub attack_index: usize,
    pub element: Element,
    pub amount: u32,
}

impl AssignBlock {
    pub fn new(enemy: EnemyInstanceId, attack_index: usize, element: Element, amount: u32) -> Self {
        Self {
            enemy,
            attack_index,
            element,
            amount,
        }
    }

    fn bucket(&self) -> PoolBucket {
        PoolBucket::melee(self.element)
    }

    fn efficiency(&self, enemy: &EnemyInstance) -> Efficiency {
        let attack = enemy.slots[self.attack_index].attack.element;
        block_efficiency(self.element, attack)
    }
}

impl CommandTransition for AssignBlock {
    type Error = CombatError;
    type Result = AssignmentId;

    fn pre_validate(&self, state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        require_phase(state, CombatPhase::Block)?;
        require_amount(self.amount)?;
        let enemy = blockable(state, self.enemy, self.attack_index)?;

        state.pool.check_available(self.bucket(), self.amount)?;

        let required = enemy.required_block(self.attack_index).unwrap_or(0);
        let tally = state
            .block(self.enemy, self.attack_index)
            .map(|block| block.tally)
            .unwrap_or_default();
        let needed = tally.raw_needed(required, self.efficiency(enemy));
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
        let required = enemy.required_block(self.attack_index).unwrap_or(0);
        let bucket = self.bucket();

        state.pool.consume(bucket, self.amount)?;

        let id = state.next_assignment_id();
        let block = state.block_entry(self.enemy, self.attack_index, required);
        block.tally.add(efficiency, self.amount);
        let accumulated = block.accumulated();

        state.ledger.push(AssignmentRecord {
            id,
            phase: state.phase,
            target: AssignmentTarget::Block {
                enemy: self.enemy,
                attack_index: self.attack_index,
            },
            bucket,
            amount: self.amount,
            efficiency,
            status: AssignmentStatus::Active,
        });
        state.events.push(CombatEvent::BlockAssigned {
            assignment: id,
            enemy: self.enemy,
            attack_index: self.attack_index,
            bucket,
            amount: self.amount,
            efficiency,
            accumulated,
            required,
        });
        settle_block(state, self.enemy, self.attack_index);

        Ok(id)
    }

    fn post_validate(&self, state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        check_invariants(state)
    }
}

/// Returns a block assignment's strength to the pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnassignBlock {
    pub assignment: AssignmentId,
}

impl UnassignBlock {
    pub fn new(assignment: AssignmentId) -> Self {
        Self { assignment }
    }
}

impl CommandTransition for UnassignBlock {
    type Error = CombatError;
    type Result = ();

    fn pre_validate(&self, state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        require_active(state)?;
        let record = state
            .record(self.assignment)
            .filter(|record| matches!(record.target, AssignmentTarget::Block { .. }))
            .ok_or(CombatError::UnknownAssignment(self.assignment))?;

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

        let AssignmentTarget::Block {
            enemy,
            attack_index,
        } = record.target
        else {
            return Err(CombatError::UnknownAssignment(self.assignment));
        };

        state.pool.refund(record.bucket, record.amount)?;
        if let Some(block) = state.block_mut(enemy, attack_index) {
            block.tally.remove(record.efficiency, record.amount);
        }

        state.events.push(CombatEvent::BlockUnassigned {
            assignment: self.assignment,
            enemy,
            attack_index,
            amount: record.amount,
        });
        settle_block(state, enemy, attack_index);

        Ok(())
    }

    fn post_validate(&self, state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        check_invariants(state)
    }
}

/// Gives up an incomplete block; the strength bound to it stays spent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbandonBlock {
    pub enemy: EnemyInstanceId,
    pub attack_index: usize,
}

impl AbandonBlock {
    pub fn new(enemy: EnemyInstanceId, attack_index: usize) -> Self {
        Self {
            enemy,
            attack_index,
        }
    }
}

impl CommandTransition for AbandonBlock {
    type Error = CombatError;
    type Result = ();

    fn pre_validate(&self, state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        require_phase(state, CombatPhase::Block)?;
        blockable(state, self.enemy, self.attack_index)?;
        match state.block(self.enemy, self.attack_index) {
            Some(block) if block.is_open() => Ok(()),
            _ => Err(CombatError::AlreadyResolved(Resolution::NothingAssigned)),
        }
    }

    fn apply(&self, state: &mut CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        let block = state
            .block_mut(self.enemy, self.attack_index)
            .ok_or(CombatError::AlreadyResolved(Resolution::NothingAssigned))?;
        let spent = block.tally.raw();
        block.tally = Default::default();

        let target = AssignmentTarget::Block {
            enemy: self.enemy,
            attack_index: self.attack_index,
        };
        for record in state
            .ledger
            .iter_mut()
            .filter(|record| record.target == target && record.is_active())
        {
            record.status = AssignmentStatus::Abandoned;
        }

        state.events.push(CombatEvent::BlockAbandoned {
            enemy: self.enemy,
            attack_index: self.attack_index,
            spent,
        });
        Ok(())
    }

    fn post_validate(&self, state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        check_invariants(state)
    }
}

/// Lowers a cumbersome enemy's attack by spending move points.
///
/// Move points are tracked outside combat; the engine only checks that the
/// reduction stays within the attack's current value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReduceAttack {
    pub enemy: EnemyInstanceId,
    pub attack_index: usize,
    pub amount: u32,
}

impl ReduceAttack {
    pub fn new(enemy: EnemyInstanceId, attack_index: usize, amount: u32) -> Self {
        Self {
            enemy,
            attack_index,
            amount,
        }
    }
}

impl CommandTransition for ReduceAttack {
    type Error = CombatError;
    type Result = ();

    fn pre_validate(&self, state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        require_phase(state, CombatPhase::Block)?;
        require_amount(self.amount)?;
        let enemy = blockable(state, self.enemy, self.attack_index)?;
        if !enemy.abilities().contains(Abilities::CUMBERSOME) {
            return Err(CombatError::IneligibleContribution(
                Ineligibility::NotCumbersome,
            ));
        }
        let value = enemy.slots[self.attack_index].value();
        if self.amount > value {
            return Err(CombatError::OverAssignment {
                requested: self.amount,
                needed: value,
            });
        }
        Ok(())
    }

    fn apply(&self, state: &mut CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        let enemy = state
            .enemy_mut(self.enemy)
            .ok_or(CombatError::UnknownEnemy(self.enemy))?;
        let abilities = enemy.abilities();
        let slot = enemy
            .slots
            .get_mut(self.attack_index)
            .ok_or(CombatError::UnknownAttack {
                enemy: self.enemy,
                attack_index: self.attack_index,
            })?;
        slot.reduction += self.amount;
        let value = slot.value();
        let required = required_block(abilities, value);

        state.events.push(CombatEvent::AttackReduced {
            enemy: self.enemy,
            attack_index: self.attack_index,
            by: self.amount,
            value,
        });

        state
            .block_entry(self.enemy, self.attack_index, required)
            .required = required;
        settle_block(state, self.enemy, self.attack_index);
        Ok(())
    }

    fn post_validate(&self, state: &CombatState, _env: &CombatEnv<'_>) -> Result<(), Self::Error> {
        check_invariants(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::FlatWoundRules;
    use crate::config::CombatConfig;
    use crate::enemy::EnemyDefinition;
    use crate::state::CombatTrigger;

    fn block_phase(definition: EnemyDefinition) -> CombatState {
        let enemy = EnemyInstance::new(EnemyInstanceId(0), definition);
        let mut state = CombatState::new(CombatTrigger::Default, 1, vec![enemy], vec![], vec![]);
        state.phase = CombatPhase::Block;
        state
            .pool
            .contribute(PoolBucket::melee(Element::Physical), 10)
            .unwrap();
        state
    }

    #[test]
    fn over_assignment_is_rejected_not_clamped() {
        let state = block_phase(EnemyDefinition::new("orc", 3, 4, 2));
        let config = CombatConfig::default();
        let env = CombatEnv::new(&config, &FlatWoundRules);

        let command = AssignBlock::new(EnemyInstanceId(0), 0, Element::Physical, 4);
        assert_eq!(
            command.pre_validate(&state, &env),
            Err(CombatError::OverAssignment {
                requested: 4,
                needed: 3
            })
        );
    }

    #[test]
    fn reducing_to_zero_blocks_the_attack() {
        let mut state = block_phase(
            EnemyDefinition::new("golem", 2, 5, 4).with_abilities(Abilities::CUMBERSOME),
        );
        let config = CombatConfig::default();
        let env = CombatEnv::new(&config, &FlatWoundRules);

        let command = ReduceAttack::new(EnemyInstanceId(0), 0, 2);
        command.pre_validate(&state, &env).unwrap();
        command.apply(&mut state, &env).unwrap();

        assert!(state.enemies[0].slots[0].blocked);
        assert_eq!(
            ReduceAttack::new(EnemyInstanceId(0), 0, 1).pre_validate(&state, &env),
            Err(CombatError::AlreadyResolved(Resolution::AttackBlocked {
                enemy: EnemyInstanceId(0),
                attack_index: 0
            }))
        );
    }

    #[test]
    fn reduction_requires_cumbersome() {
        let state = block_phase(EnemyDefinition::new("orc", 3, 4, 2));
        let config = CombatConfig::default();
        let env = CombatEnv::new(&config, &FlatWoundRules);

        assert_eq!(
            ReduceAttack::new(EnemyInstanceId(0), 0, 1).pre_validate(&state, &env),
            Err(CombatError::IneligibleContribution(
                Ineligibility::NotCumbersome
            ))
        );
    }
}
