//! End-to-end runtime tests: bundled content, persisted logs and replay.

use combat_content::ContentFactory;
use combat_core::{
    AttackType, AssignBlock, CombatCommand, CombatEvent, CombatOutcome, CombatSession,
    CombatTrigger, Element, EnemyInstanceId,
};
use combat_runtime::{
    CombatRuntime, CommandEvent, CommandLogEntry, CommandRepository, Event, MemoryLog,
    RepositoryError, RuntimeError, SessionCatalog, SessionEvent, SessionStore, Topic, replay,
};

fn scenario_session(name: &str) -> (CombatSession, Vec<CombatCommand>) {
    let factory = ContentFactory::new(ContentFactory::bundled_data_dir());
    let table = factory.load_enemies().unwrap();
    let config = factory.load_config().unwrap();
    let scenario = factory.load_scenario(name).unwrap();

    let session = scenario.build_session(&table, &config).unwrap();
    (session, scenario.commands())
}

#[tokio::test]
async fn scripted_combat_is_published_and_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = SessionCatalog::new(dir.path());
    let (session, commands) = scenario_session("orc_ambush");

    let mut runtime = CombatRuntime::builder()
        .session_id("session_ambush")
        .scenario("orc_ambush")
        .persist_to(catalog.clone())
        .build(session)
        .unwrap();
    let mut combat = runtime.subscribe(Topic::Combat);
    let mut sessions = runtime.subscribe(Topic::Session);

    let executed = runtime.run_script(&commands).unwrap();
    assert_eq!(executed, commands.len());
    assert_eq!(runtime.session().outcome(), Some(CombatOutcome::Victory));

    let manifest = runtime.close().unwrap();
    assert_eq!(manifest.outcome, Some(CombatOutcome::Victory));
    assert_eq!(manifest.commands, commands.len() as u64);
    assert!(manifest.is_closed());

    let Event::Combat(first) = combat.recv().await.unwrap() else {
        panic!("expected a combat event");
    };
    assert_eq!(first.nonce, 0);
    assert!(matches!(first.event, CombatEvent::CombatStarted { .. }));

    let Event::Session(closed) = sessions.recv().await.unwrap() else {
        panic!("expected a session event");
    };
    assert!(matches!(
        closed,
        SessionEvent::Closed {
            outcome: Some(CombatOutcome::Victory),
            ..
        }
    ));

    let files = catalog.session("session_ambush");
    assert_eq!(files.read_commands().unwrap().len(), commands.len());
    assert!(matches!(
        files.read_events().unwrap().first(),
        Some(Event::Session(SessionEvent::Opened { .. }))
    ));

    let report = replay(&files).unwrap();
    assert_eq!(report.commands, commands.len());
    assert_eq!(report.outcome, Some(CombatOutcome::Victory));
    assert!(report.final_root_verified);
    assert_eq!(catalog.latest().unwrap().unwrap().session_id, "session_ambush");
}

#[tokio::test]
async fn rejected_command_is_reported_but_not_logged() {
    let (session, _) = scenario_session("orc_ambush");
    let mut runtime = CombatRuntime::builder().build(session).unwrap();
    let mut commands = runtime.subscribe(Topic::Command);

    runtime
        .execute(&combat_core::StartCombat.into())
        .unwrap();
    let before = runtime.session().state().clone();

    // Blocking is not possible during the ranged and siege phase.
    let block: CombatCommand =
        AssignBlock::new(EnemyInstanceId(0), 0, Element::Physical, 4).into();
    let err = runtime.execute(&block).unwrap_err();
    assert!(matches!(err, RuntimeError::Command(_)));
    assert_eq!(runtime.session().state(), &before);

    let started = commands.recv().await.unwrap();
    assert!(matches!(
        started,
        Event::Command(CommandEvent::Executed { nonce: 0, .. })
    ));
    let Event::Command(rejected) = commands.recv().await.unwrap() else {
        panic!("expected a command event");
    };
    assert!(rejected.is_rejected());
    assert_eq!(rejected.nonce(), 1);

    assert_eq!(runtime.store().commands().unwrap().len(), 1);
}

#[test]
fn tampered_manifest_fails_replay() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = SessionCatalog::new(dir.path());
    let (session, commands) = scenario_session("keep_assault");

    let mut runtime = CombatRuntime::builder()
        .session_id("session_keep")
        .persist_to(catalog.clone())
        .build(session)
        .unwrap();
    runtime.run_script(&commands).unwrap();
    let mut manifest = runtime.close().unwrap();

    let files = catalog.session("session_keep");
    manifest.final_root = Some(hex::encode([0u8; 32]));
    files.save_manifest(&manifest).unwrap();

    assert!(matches!(
        replay(&files),
        Err(RuntimeError::ReplayDiverged { .. })
    ));
}

#[test]
fn unpersisted_runtime_keeps_logs_in_memory() {
    let session = CombatSession::builder(CombatTrigger::Challenge)
        .enemy("prowlers")
        .build(
            &ContentFactory::new(ContentFactory::bundled_data_dir())
                .load_enemies()
                .unwrap(),
        )
        .unwrap();
    let mut runtime = CombatRuntime::builder().build(session).unwrap();

    runtime.execute(&combat_core::StartCombat.into()).unwrap();
    runtime
        .execute(&combat_core::Contribute::new(AttackType::Ranged, Element::Fire, 2).into())
        .unwrap();

    let store = runtime.store();
    assert!(!store.is_persistent());
    assert_eq!(store.commands().unwrap().len(), 2);
    // Opened, then per command: domain events plus the command outcome.
    assert!(store.events().unwrap().len() >= 5);
}

#[test]
fn replay_refuses_table_version_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = SessionCatalog::new(dir.path());
    let (session, commands) = scenario_session("orc_ambush");

    let mut runtime = CombatRuntime::builder()
        .session_id("session_versions")
        .persist_to(catalog.clone())
        .build(session)
        .unwrap();
    runtime.run_script(&commands).unwrap();
    let mut manifest = runtime.close().unwrap();

    let files = catalog.session("session_versions");
    manifest.table_version += 1;
    files.save_manifest(&manifest).unwrap();

    assert!(matches!(
        replay(&files),
        Err(RuntimeError::TableVersionMismatch { .. })
    ));
}

/// Command log whose disk is full.
struct FullDisk;

impl CommandRepository for FullDisk {
    fn append(&mut self, _entry: &CommandLogEntry) -> Result<u64, RepositoryError> {
        Err(RepositoryError::Io(std::io::Error::other("no space left on device")))
    }

    fn read_at_offset(&self, _offset: u64) -> Result<Option<(CommandLogEntry, u64)>, RepositoryError> {
        Ok(None)
    }

    fn flush(&mut self) -> Result<(), RepositoryError> {
        Ok(())
    }

    fn size(&self) -> Result<u64, RepositoryError> {
        Ok(0)
    }

    fn name(&self) -> &str {
        "commands.log"
    }
}

#[test]
fn failed_command_log_halts_the_runtime() {
    let (session, _) = scenario_session("orc_ambush");
    let store = SessionStore::with_logs(
        "session_full_disk",
        Box::new(FullDisk),
        Box::new(MemoryLog::<Event>::new("events.log")),
    );
    let mut runtime = CombatRuntime::builder().store(store).build(session).unwrap();
    assert_eq!(runtime.session_id(), "session_full_disk");

    let err = runtime
        .execute(&combat_core::StartCombat.into())
        .unwrap_err();
    assert!(matches!(err, RuntimeError::Repository(RepositoryError::Io(_))));
    // the session moved on even though the command was not logged
    assert_eq!(runtime.session().state().nonce, 1);
    assert_eq!(runtime.halted_at(), Some(0));

    let err = runtime
        .execute(&combat_core::AdvancePhase.into())
        .unwrap_err();
    assert!(matches!(err, RuntimeError::Halted { nonce: 0 }));
    assert_eq!(runtime.session().state().nonce, 1);
}
