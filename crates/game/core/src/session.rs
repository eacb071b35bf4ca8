//! Top-level combat session: setup, command execution and queries.
//!
//! A session exclusively owns its [`CombatState`]. Nothing is global, so any
//! number of sessions can coexist.

use std::collections::BTreeSet;

use crate::combat::{WoundRules, wound_rules_for};
use crate::command::{
    AbandonAttack, AbandonBlock, AdvancePhase, AssignAttack, AssignBlock, AssignDamage,
    CombatCommand, Contribute, ReduceAttack, StartCombat, UnassignAttack, UnassignBlock, Withdraw,
};
use crate::config::CombatConfig;
use crate::engine::{CombatEngine, ExecuteError, ExecutionOutcome};
use crate::enemy::{EnemyDefinition, EnemyOracle};
use crate::env::CombatEnv;
use crate::error::{ErrorSeverity, GameError};
use crate::events::CombatEvent;
use crate::pool::AttackPool;
use crate::state::{
    CombatOutcome, CombatPhase, CombatState, CombatTrigger, DamageAssignment, DamageTarget,
    EnemyInstance, EnemyView, HeroState, UnitInstance, UnitSpec,
};
use crate::types::{AssignmentId, AttackType, Element, EnemyInstanceId, EnemyTypeId, UnitId};

/// Errors raised while assembling a session.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("a combat needs at least one enemy")]
    NoEnemies,

    #[error("{count} enemies declared, at most {max} allowed")]
    TooManyEnemies { count: usize, max: usize },

    #[error("enemy type '{0}' is not in the enemy table")]
    UnknownEnemyType(EnemyTypeId),

    #[error("enemy type '{summoner}' summons unknown type '{summons}'")]
    UnknownSummon {
        summoner: EnemyTypeId,
        summons: EnemyTypeId,
    },
}

impl GameError for SetupError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NoEnemies => "SETUP_NO_ENEMIES",
            Self::TooManyEnemies { .. } => "SETUP_TOO_MANY_ENEMIES",
            Self::UnknownEnemyType(_) => "SETUP_UNKNOWN_ENEMY_TYPE",
            Self::UnknownSummon { .. } => "SETUP_UNKNOWN_SUMMON",
        }
    }
}

/// Declares the enemies and units of a combat before it starts.
#[derive(Clone, Debug)]
pub struct SessionBuilder {
    trigger: CombatTrigger,
    enemies: Vec<EnemyTypeId>,
    units: Vec<UnitSpec>,
    config: CombatConfig,
}

impl SessionBuilder {
    pub fn new(trigger: CombatTrigger) -> Self {
        Self {
            trigger,
            enemies: Vec::new(),
            units: Vec::new(),
            config: CombatConfig::default(),
        }
    }

    pub fn enemy(mut self, kind: impl Into<EnemyTypeId>) -> Self {
        self.enemies.push(kind.into());
        self
    }

    pub fn enemies<I, T>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<EnemyTypeId>,
    {
        self.enemies.extend(kinds.into_iter().map(Into::into));
        self
    }

    pub fn unit(mut self, unit: UnitSpec) -> Self {
        self.units.push(unit);
        self
    }

    pub fn units(mut self, units: impl IntoIterator<Item = UnitSpec>) -> Self {
        self.units.extend(units);
        self
    }

    pub fn config(mut self, config: CombatConfig) -> Self {
        self.config = config;
        self
    }

    /// Copies the declared definitions out of the enemy table.
    ///
    /// The table is only read here; later changes to it do not affect the
    /// session.
    pub fn build(self, table: &dyn EnemyOracle) -> Result<CombatSession, SetupError> {
        if self.enemies.is_empty() {
            return Err(SetupError::NoEnemies);
        }
        if self.enemies.len() > self.config.max_enemies {
            return Err(SetupError::TooManyEnemies {
                count: self.enemies.len(),
                max: self.config.max_enemies,
            });
        }

        let mut enemies = Vec::with_capacity(self.enemies.len());
        let mut summons = BTreeSet::new();
        for (index, kind) in self.enemies.iter().enumerate() {
            let definition = table
                .definition(kind)
                .ok_or_else(|| SetupError::UnknownEnemyType(kind.clone()))?;
            if let Some(summoned) = &definition.summons {
                summons.insert((definition.id.clone(), summoned.clone()));
            }
            enemies.push(EnemyInstance::new(
                EnemyInstanceId(index as u32),
                definition.clone(),
            ));
        }

        let mut summon_table: Vec<EnemyDefinition> = Vec::new();
        for (summoner, kind) in summons {
            let definition = table.definition(&kind).ok_or(SetupError::UnknownSummon {
                summoner,
                summons: kind.clone(),
            })?;
            if !summon_table.iter().any(|known| known.id == kind) {
                summon_table.push(definition.clone());
            }
        }

        let units = self
            .units
            .into_iter()
            .enumerate()
            .map(|(index, spec)| UnitInstance::new(UnitId(index as u32), spec))
            .collect();

        let state = CombatState::new(
            self.trigger,
            table.version(),
            enemies,
            units,
            summon_table,
        );
        Ok(CombatSession::from_state(state, self.config))
    }
}

/// One combat, from declaration to outcome.
pub struct CombatSession {
    state: CombatState,
    config: CombatConfig,
    wounds: Box<dyn WoundRules + Send + Sync>,
}

impl CombatSession {
    pub fn builder(trigger: CombatTrigger) -> SessionBuilder {
        SessionBuilder::new(trigger)
    }

    /// Wraps an existing state, e.g. one restored from a snapshot.
    pub fn from_state(state: CombatState, config: CombatConfig) -> Self {
        let wounds = wound_rules_for(&config);
        Self {
            state,
            config,
            wounds,
        }
    }

    /// Replaces the wound conversion rules selected by the config.
    pub fn with_wound_rules(mut self, rules: impl WoundRules + Send + Sync + 'static) -> Self {
        self.wounds = Box::new(rules);
        self
    }

    /// Runs one command through the engine.
    pub fn execute(&mut self, command: &CombatCommand) -> Result<ExecutionOutcome, ExecuteError> {
        let env = CombatEnv::new(&self.config, self.wounds.as_ref());
        CombatEngine::new(&mut self.state).execute(env, command)
    }

    fn run(&mut self, command: impl Into<CombatCommand>) -> Result<ExecutionOutcome, ExecuteError> {
        self.execute(&command.into())
    }

    // ===== commands =====

    pub fn start(&mut self) -> Result<ExecutionOutcome, ExecuteError> {
        self.run(StartCombat)
    }

    pub fn contribute(
        &mut self,
        kind: AttackType,
        element: Element,
        amount: u32,
    ) -> Result<ExecutionOutcome, ExecuteError> {
        self.run(Contribute::new(kind, element, amount))
    }

    pub fn assign_block(
        &mut self,
        enemy: EnemyInstanceId,
        attack_index: usize,
        element: Element,
        amount: u32,
    ) -> Result<AssignmentId, ExecuteError> {
        let id = self.state.next_assignment_id();
        self.run(AssignBlock::new(enemy, attack_index, element, amount))?;
        Ok(id)
    }

    pub fn unassign_block(&mut self, assignment: AssignmentId) -> Result<ExecutionOutcome, ExecuteError> {
        self.run(UnassignBlock::new(assignment))
    }

    pub fn abandon_block(
        &mut self,
        enemy: EnemyInstanceId,
        attack_index: usize,
    ) -> Result<ExecutionOutcome, ExecuteError> {
        self.run(AbandonBlock::new(enemy, attack_index))
    }

    pub fn reduce_attack(
        &mut self,
        enemy: EnemyInstanceId,
        attack_index: usize,
        amount: u32,
    ) -> Result<ExecutionOutcome, ExecuteError> {
        self.run(ReduceAttack::new(enemy, attack_index, amount))
    }

    pub fn assign_attack(
        &mut self,
        enemy: EnemyInstanceId,
        kind: AttackType,
        element: Element,
        amount: u32,
    ) -> Result<AssignmentId, ExecuteError> {
        let id = self.state.next_assignment_id();
        self.run(AssignAttack::new(enemy, kind, element, amount))?;
        Ok(id)
    }

    pub fn unassign_attack(&mut self, assignment: AssignmentId) -> Result<ExecutionOutcome, ExecuteError> {
        self.run(UnassignAttack::new(assignment))
    }

    pub fn abandon_attack(&mut self, enemy: EnemyInstanceId) -> Result<ExecutionOutcome, ExecuteError> {
        self.run(AbandonAttack::new(enemy))
    }

    pub fn assign_damage(
        &mut self,
        entry: usize,
        target: DamageTarget,
    ) -> Result<ExecutionOutcome, ExecuteError> {
        self.run(AssignDamage::new(entry, target))
    }

    pub fn advance_phase(&mut self) -> Result<ExecutionOutcome, ExecuteError> {
        self.run(AdvancePhase)
    }

    pub fn withdraw(&mut self) -> Result<ExecutionOutcome, ExecuteError> {
        self.run(Withdraw)
    }

    // ===== queries =====

    pub fn state(&self) -> &CombatState {
        &self.state
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn phase(&self) -> CombatPhase {
        self.state.phase
    }

    pub fn outcome(&self) -> Option<CombatOutcome> {
        self.state.outcome
    }

    pub fn is_resolved(&self) -> bool {
        self.state.phase == CombatPhase::Resolved
    }

    pub fn fame(&self) -> u32 {
        self.state.fame
    }

    pub fn pool(&self) -> &AttackPool {
        &self.state.pool
    }

    pub fn hero(&self) -> &HeroState {
        &self.state.hero
    }

    pub fn units(&self) -> &[UnitInstance] {
        &self.state.units
    }

    pub fn enemy_view(&self, id: EnemyInstanceId) -> Option<EnemyView> {
        self.state.enemy_view(id)
    }

    pub fn enemy_views(&self) -> Vec<EnemyView> {
        self.state.enemy_views()
    }

    /// Unassigned damage entries with their queue index.
    pub fn pending_damage(&self) -> Vec<(usize, &DamageAssignment)> {
        self.state.pending_damage().collect()
    }

    pub fn events(&self) -> impl Iterator<Item = &CombatEvent> {
        self.state.events.iter()
    }
}

impl core::fmt::Debug for CombatSession {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CombatSession")
            .field("phase", &self.state.phase)
            .field("nonce", &self.state.nonce)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
