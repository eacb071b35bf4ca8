//! Deterministic combat resolution rules.
//!
//! `combat-core` turns a declared set of enemies and the attack and block
//! strength contributed by a hero and units into phase transitions,
//! ability-modified thresholds and outcomes. All state mutation flows through
//! [`engine::CombatEngine`]; [`session::CombatSession`] wraps it with setup
//! and queries for callers.
pub mod combat;
pub mod command;
pub mod config;
pub mod enemy;
pub mod engine;
pub mod env;
pub mod error;
pub mod events;
pub mod pool;
pub mod session;
pub mod state;
pub mod types;

pub use combat::{
    ArmorWoundRules, Efficiency, FlatWoundRules, HeroWounds, Hit, Tally, WoundRules,
    wound_rules_for,
};
pub use command::{
    AbandonAttack, AbandonBlock, AdvancePhase, AssignAttack, AssignBlock, AssignDamage,
    CombatCommand, CombatError, CommandKind, CommandResult, CommandTransition, Contribute,
    Ineligibility, PhaseRule, ReduceAttack, Resolution, StartCombat, UnassignAttack,
    UnassignBlock, Withdraw,
};
pub use config::{CombatConfig, WoundRulesKind};
pub use enemy::{
    Abilities, EnemyAttack, EnemyAttacks, EnemyDefinition, EnemyOracle, EnemyRegistry,
    RegistryError, Resistances,
};
pub use engine::{
    CombatEngine, ExecuteError, ExecutionOutcome, TransitionPhase, TransitionPhaseError,
};
pub use env::CombatEnv;
pub use error::{ErrorSeverity, GameError};
pub use events::{CombatEvent, DamageOutcome, EventLog};
pub use pool::{AttackPool, PoolBucket, PoolError};
pub use session::{CombatSession, SessionBuilder, SetupError};
pub use state::{
    AssignmentRecord, AssignmentStatus, AssignmentTarget, AttackAssignment, AttackSlot,
    AttackView, BlockAssignment, CombatOutcome, CombatPhase, CombatState, CombatTrigger,
    DamageAssignment, DamageTarget, EnemyInstance, EnemyView, HeroState, UnitCondition,
    UnitInstance, UnitSpec,
};
pub use types::{AssignmentId, AttackType, Element, EnemyInstanceId, EnemyTypeId, UnitId};

