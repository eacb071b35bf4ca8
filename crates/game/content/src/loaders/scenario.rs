//! Scripted combat scenarios.
//!
//! A scenario names the enemies and units of one combat plus an optional
//! script of player steps. Steps use plain numbers for ids so the RON stays
//! readable; [`ScriptStep::to_command`] turns them into engine commands.

use std::path::Path;

use anyhow::Context;
use combat_core::{
    AbandonAttack, AbandonBlock, AdvancePhase, AssignAttack, AssignBlock, AssignDamage,
    AssignmentId, AttackType, CombatCommand, CombatConfig, CombatOutcome, CombatSession,
    CombatTrigger, Contribute, DamageTarget, Element, EnemyInstanceId, EnemyOracle, EnemyTypeId,
    ReduceAttack, StartCombat, UnassignAttack, UnassignBlock, UnitId, UnitSpec, Withdraw,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Recipient of a scripted damage step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScriptTarget {
    Hero,
    Unit(u32),
}

/// One scripted player action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScriptStep {
    Start,
    Advance,
    Withdraw,
    Contribute {
        kind: AttackType,
        element: Element,
        amount: u32,
    },
    Block {
        enemy: u32,
        #[serde(default)]
        attack: usize,
        element: Element,
        amount: u32,
    },
    UnassignBlock {
        assignment: u32,
    },
    AbandonBlock {
        enemy: u32,
        #[serde(default)]
        attack: usize,
    },
    Reduce {
        enemy: u32,
        #[serde(default)]
        attack: usize,
        amount: u32,
    },
    Attack {
        enemy: u32,
        kind: AttackType,
        element: Element,
        amount: u32,
    },
    UnassignAttack {
        assignment: u32,
    },
    AbandonAttack {
        enemy: u32,
    },
    Damage {
        entry: usize,
        target: ScriptTarget,
    },
}

impl ScriptStep {
    pub fn to_command(&self) -> CombatCommand {
        match *self {
            Self::Start => StartCombat.into(),
            Self::Advance => AdvancePhase.into(),
            Self::Withdraw => Withdraw.into(),
            Self::Contribute {
                kind,
                element,
                amount,
            } => Contribute::new(kind, element, amount).into(),
            Self::Block {
                enemy,
                attack,
                element,
                amount,
            } => AssignBlock::new(EnemyInstanceId(enemy), attack, element, amount).into(),
            Self::UnassignBlock { assignment } => {
                UnassignBlock::new(AssignmentId(assignment)).into()
            }
            Self::AbandonBlock { enemy, attack } => {
                AbandonBlock::new(EnemyInstanceId(enemy), attack).into()
            }
            Self::Reduce {
                enemy,
                attack,
                amount,
            } => ReduceAttack::new(EnemyInstanceId(enemy), attack, amount).into(),
            Self::Attack {
                enemy,
                kind,
                element,
                amount,
            } => AssignAttack::new(EnemyInstanceId(enemy), kind, element, amount).into(),
            Self::UnassignAttack { assignment } => {
                UnassignAttack::new(AssignmentId(assignment)).into()
            }
            Self::AbandonAttack { enemy } => AbandonAttack::new(EnemyInstanceId(enemy)).into(),
            Self::Damage { entry, target } => {
                let target = match target {
                    ScriptTarget::Hero => DamageTarget::Hero,
                    ScriptTarget::Unit(id) => DamageTarget::Unit(UnitId(id)),
                };
                AssignDamage::new(entry, target).into()
            }
        }
    }
}

/// One combat described in data.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub trigger: CombatTrigger,
    pub enemies: Vec<EnemyTypeId>,
    #[serde(default)]
    pub units: Vec<UnitSpec>,
    /// Overrides the factory config for this scenario only.
    #[serde(default)]
    pub config: Option<CombatConfig>,
    #[serde(default)]
    pub script: Vec<ScriptStep>,
    /// Outcome the script is expected to reach, checked by the simulator.
    #[serde(default)]
    pub expect: Option<CombatOutcome>,
}

impl Scenario {
    pub fn commands(&self) -> Vec<CombatCommand> {
        self.script.iter().map(ScriptStep::to_command).collect()
    }

    /// Builds a session for this scenario against `table`.
    ///
    /// `default_config` is used unless the scenario carries its own.
    pub fn build_session(
        &self,
        table: &dyn EnemyOracle,
        default_config: &CombatConfig,
    ) -> LoadResult<CombatSession> {
        let config = self.config.clone().unwrap_or_else(|| default_config.clone());
        CombatSession::builder(self.trigger)
            .enemies(self.enemies.iter().cloned())
            .units(self.units.iter().cloned())
            .config(config)
            .build(table)
            .with_context(|| format!("scenario '{}' cannot be set up", self.name))
    }
}

/// Loader for scenario RON files.
pub struct ScenarioLoader;

impl ScenarioLoader {
    pub fn load(path: &Path) -> LoadResult<Scenario> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<Scenario> {
        let scenario: Scenario = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse scenario RON: {}", e))?;
        if scenario.enemies.is_empty() {
            anyhow::bail!("scenario '{}' declares no enemies", scenario.name);
        }
        Ok(scenario)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{CommandKind, EnemyDefinition, EnemyRegistry};

    const SCENARIO: &str = r#"(
        name: "lone orc",
        trigger: provoke_rampaging,
        enemies: ["orc"],
        units: [(name: "peasants")],
        script: [
            Start,
            Advance,
            Contribute(kind: Melee, element: Physical, amount: 4),
            Block(enemy: 0, element: Physical, amount: 4),
            Advance,
            Contribute(kind: Melee, element: Physical, amount: 3),
            Attack(enemy: 0, kind: Melee, element: Physical, amount: 3),
        ],
        expect: Some(Victory),
    )"#;

    #[test]
    fn parses_script_into_commands() {
        let scenario = ScenarioLoader::parse(SCENARIO).unwrap();
        assert_eq!(scenario.trigger, CombatTrigger::ProvokeRampaging);
        assert_eq!(scenario.expect, Some(CombatOutcome::Victory));

        let kinds: Vec<_> = scenario.commands().iter().map(CombatCommand::kind).collect();
        assert_eq!(
            kinds,
            vec![
                CommandKind::Start,
                CommandKind::AdvancePhase,
                CommandKind::Contribute,
                CommandKind::AssignBlock,
                CommandKind::AdvancePhase,
                CommandKind::Contribute,
                CommandKind::AssignAttack,
            ]
        );
    }

    #[test]
    fn script_reaches_expected_outcome() {
        let scenario = ScenarioLoader::parse(SCENARIO).unwrap();
        let table =
            EnemyRegistry::from_definitions(1, [EnemyDefinition::new("orc", 4, 3, 2)]).unwrap();

        let mut session = scenario
            .build_session(&table, &CombatConfig::default())
            .unwrap();
        for command in scenario.commands() {
            session.execute(&command).unwrap();
        }
        assert_eq!(session.outcome(), scenario.expect);
    }

    #[test]
    fn unknown_enemy_fails_setup() {
        let scenario = ScenarioLoader::parse(SCENARIO).unwrap();
        let table = EnemyRegistry::new(1);

        let err = scenario
            .build_session(&table, &CombatConfig::default())
            .unwrap_err();
        assert!(format!("{err:#}").contains("lone orc"));
    }
}
