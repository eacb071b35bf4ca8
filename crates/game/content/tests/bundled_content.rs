//! Loads the data shipped with the crate and plays every scenario script.

use combat_content::ContentFactory;
use combat_core::{EnemyOracle, EnemyTypeId};

fn factory() -> ContentFactory {
    ContentFactory::new(ContentFactory::bundled_data_dir())
}

#[test]
fn bundled_table_is_valid() {
    let table = factory().load_enemies().unwrap();
    assert!(table.version() >= 1);

    let summoner = table
        .definition(&EnemyTypeId::from("orc_summoners"))
        .unwrap();
    assert_eq!(summoner.summons, Some(EnemyTypeId::from("prowlers")));
}

#[test]
fn every_scenario_reaches_its_expected_outcome() {
    let factory = factory();
    let table = factory.load_enemies().unwrap();
    let config = factory.load_config().unwrap();

    let names = factory.scenario_names().unwrap();
    assert!(!names.is_empty());

    for name in names {
        let scenario = factory.load_scenario(&name).unwrap();
        let mut session = scenario.build_session(&table, &config).unwrap();

        for command in scenario.commands() {
            if let Err(err) = session.execute(&command) {
                panic!("{name}: {:?} rejected: {err}", command.kind());
            }
        }
        assert_eq!(session.outcome(), scenario.expect, "{name}");
    }
}
