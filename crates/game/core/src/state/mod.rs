//! Authoritative combat state representation.
//!
//! This module owns the data structures that describe one combat: enemy and
//! unit instances, the attack pool, assignment bookkeeping, the damage queue
//! and the append-only event log. Callers query this state but mutate it
//! exclusively through [`crate::engine::CombatEngine`].
mod assignment;
mod enemy;
mod party;
mod view;

pub use assignment::{
    AssignmentRecord, AssignmentStatus, AssignmentTarget, AttackAssignment, BlockAssignment, DamageAssignment,
    DamageTarget,
};
pub use enemy::{AttackSlot, EnemyInstance};
pub use party::{HeroState, UnitCondition, UnitInstance, UnitSpec};
pub use view::{AttackView, EnemyView};

use crate::enemy::EnemyDefinition;
use crate::events::EventLog;
use crate::pool::AttackPool;
use crate::types::{AssignmentId, EnemyInstanceId, EnemyTypeId, UnitId};

/// Combat phases in their fixed order.
///
/// The derived ordering is the phase order; a session's phase only ever
/// increases.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum CombatPhase {
    #[default]
    NotStarted,
    RangedAndSiege,
    Block,
    AssignDamage,
    Attack,
    Resolved,
}

impl CombatPhase {
    /// True for the four phases in which commands other than start are accepted.
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::NotStarted | Self::Resolved)
    }
}

/// What started the combat. Recorded for narration; only affects withdrawal.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CombatTrigger {
    FortifiedAssault,
    ProvokeRampaging,
    Challenge,
    #[default]
    Default,
}

impl CombatTrigger {
    /// An assault on a fortified site cannot be abandoned once declared.
    pub const fn permits_withdrawal(self) -> bool {
        !matches!(self, Self::FortifiedAssault)
    }
}

/// Final result of a combat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum CombatOutcome {
    /// Every enemy was defeated.
    Victory,
    /// The hero withdrew, or the attack phase ended with enemies remaining.
    PartialSurvival,
    /// The hero's knockout threshold was reached while taking damage.
    KnockedOut,
}

/// Canonical snapshot of one combat.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatState {
    pub trigger: CombatTrigger,
    pub phase: CombatPhase,

    /// Count of successfully executed commands.
    pub nonce: u64,

    /// Version of the enemy table the instances were copied from.
    pub table_version: u32,

    pub enemies: Vec<EnemyInstance>,
    pub units: Vec<UnitInstance>,
    pub hero: HeroState,
    pub pool: AttackPool,

    pub blocks: Vec<BlockAssignment>,
    pub attacks: Vec<AttackAssignment>,
    pub ledger: Vec<AssignmentRecord>,
    pub damage: Vec<DamageAssignment>,

    /// Definitions summoners may draw, copied from the table at setup.
    pub summon_table: Vec<EnemyDefinition>,

    pub fame: u32,
    pub outcome: Option<CombatOutcome>,
    pub events: EventLog,
}

impl CombatState {
    /// Creates a not-yet-started combat.
    pub fn new(
        trigger: CombatTrigger,
        table_version: u32,
        enemies: Vec<EnemyInstance>,
        units: Vec<UnitInstance>,
        summon_table: Vec<EnemyDefinition>,
    ) -> Self {
        Self {
            trigger,
            phase: CombatPhase::NotStarted,
            nonce: 0,
            table_version,
            enemies,
            units,
            hero: HeroState::default(),
            pool: AttackPool::new(),
            blocks: Vec::new(),
            attacks: Vec::new(),
            ledger: Vec::new(),
            damage: Vec::new(),
            summon_table,
            fame: 0,
            outcome: None,
            events: EventLog::default(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase.is_active()
    }

    pub fn enemy(&self, id: EnemyInstanceId) -> Option<&EnemyInstance> {
        self.enemies.iter().find(|enemy| enemy.id == id)
    }

    pub fn enemy_mut(&mut self, id: EnemyInstanceId) -> Option<&mut EnemyInstance> {
        self.enemies.iter_mut().find(|enemy| enemy.id == id)
    }

    pub fn unit(&self, id: UnitId) -> Option<&UnitInstance> {
        self.units.iter().find(|unit| unit.id == id)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut UnitInstance> {
        self.units.iter_mut().find(|unit| unit.id == id)
    }

    pub fn block(&self, enemy: EnemyInstanceId, attack_index: usize) -> Option<&BlockAssignment> {
        self.blocks
            .iter()
            .find(|block| block.enemy == enemy && block.attack_index == attack_index)
    }

    pub fn block_mut(
        &mut self,
        enemy: EnemyInstanceId,
        attack_index: usize,
    ) -> Option<&mut BlockAssignment> {
        self.blocks
            .iter_mut()
            .find(|block| block.enemy == enemy && block.attack_index == attack_index)
    }

    /// Returns the block assignment for an attack, opening one if needed.
    pub fn block_entry(
        &mut self,
        enemy: EnemyInstanceId,
        attack_index: usize,
        required: u32,
    ) -> &mut BlockAssignment {
        let position = self
            .blocks
            .iter()
            .position(|block| block.enemy == enemy && block.attack_index == attack_index);
        let index = match position {
            Some(index) => index,
            None => {
                self.blocks
                    .push(BlockAssignment::new(enemy, attack_index, required));
                self.blocks.len() - 1
            }
        };
        &mut self.blocks[index]
    }

    pub fn attack(&self, enemy: EnemyInstanceId) -> Option<&AttackAssignment> {
        self.attacks.iter().find(|attack| attack.enemy == enemy)
    }

    pub fn attack_mut(&mut self, enemy: EnemyInstanceId) -> Option<&mut AttackAssignment> {
        self.attacks.iter_mut().find(|attack| attack.enemy == enemy)
    }

    /// Returns the attack assignment for an enemy, opening one if needed.
    pub fn attack_entry(&mut self, enemy: EnemyInstanceId, armor: u32) -> &mut AttackAssignment {
        let position = self.attacks.iter().position(|attack| attack.enemy == enemy);
        let index = match position {
            Some(index) => index,
            None => {
                self.attacks.push(AttackAssignment::new(enemy, armor));
                self.attacks.len() - 1
            }
        };
        &mut self.attacks[index]
    }

    pub fn record(&self, id: AssignmentId) -> Option<&AssignmentRecord> {
        self.ledger.iter().find(|record| record.id == id)
    }

    pub fn record_mut(&mut self, id: AssignmentId) -> Option<&mut AssignmentRecord> {
        self.ledger.iter_mut().find(|record| record.id == id)
    }

    /// Next assignment handle; handles are never reused.
    pub fn next_assignment_id(&self) -> AssignmentId {
        AssignmentId(self.ledger.len() as u32)
    }

    /// Next enemy instance id, used for summoned enemies.
    pub fn next_enemy_id(&self) -> EnemyInstanceId {
        let next = self
            .enemies
            .iter()
            .map(|enemy| enemy.id.0 + 1)
            .max()
            .unwrap_or(0);
        EnemyInstanceId(next)
    }

    pub fn summon_definition(&self, id: &EnemyTypeId) -> Option<&EnemyDefinition> {
        self.summon_table.iter().find(|definition| &definition.id == id)
    }

    /// Enemies that were declared into the combat (not summoned).
    pub fn declared_enemies(&self) -> impl Iterator<Item = &EnemyInstance> {
        self.enemies.iter().filter(|enemy| !enemy.is_summoned())
    }

    /// True when every declared enemy is defeated.
    pub fn all_defeated(&self) -> bool {
        self.declared_enemies().all(|enemy| enemy.defeated)
    }

    /// Block or attack assignments that hold strength but are neither
    /// complete nor abandoned.
    pub fn open_assignments(&self) -> usize {
        let blocks = self.blocks.iter().filter(|block| block.is_open()).count();
        let attacks = self.attacks.iter().filter(|attack| attack.is_open()).count();
        blocks + attacks
    }

    /// Damage entries not yet assigned to a target.
    pub fn pending_damage(&self) -> impl Iterator<Item = (usize, &DamageAssignment)> {
        self.damage
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.target.is_none())
    }

    pub fn enemy_view(&self, id: EnemyInstanceId) -> Option<EnemyView> {
        self.enemy(id).map(|enemy| EnemyView::new(self, enemy))
    }

    pub fn enemy_views(&self) -> Vec<EnemyView> {
        self.enemies
            .iter()
            .map(|enemy| EnemyView::new(self, enemy))
            .collect()
    }

    /// SHA-256 over the bincode encoding of the whole state.
    ///
    /// Two sessions that executed the same commands from the same initial
    /// state have the same root.
    #[cfg(feature = "serde")]
    pub fn state_root(&self) -> Result<[u8; 32], bincode::Error> {
        use sha2::{Digest, Sha256};

        let bytes = bincode::serialize(self)?;
        Ok(Sha256::digest(&bytes).into())
    }
}
