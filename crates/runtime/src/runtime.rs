//! Runtime wrapper around one combat session.
//!
//! [`CombatRuntime`] executes commands against a [`CombatSession`], logs
//! them, writes the command and event logs and fans events out on the
//! [`EventBus`]. The engine itself stays synchronous; the bus lets async
//! observers follow along.

use chrono::Utc;

use combat_core::{
    CombatCommand, CombatPhase, CombatSession, ExecuteError, ExecutionOutcome, GameError,
};

use crate::error::{Result, RuntimeError};
use crate::events::{CombatEventRecord, CommandEvent, Event, EventBus, SessionEvent, Topic};
use crate::repository::{
    CommandLogEntry, SessionCatalog, SessionFiles, SessionManifest, SessionStore,
};

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Capacity of each event bus topic.
    pub event_buffer_size: usize,
    /// Flush logs after every command instead of on close.
    pub flush_every_command: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            event_buffer_size: 256,
            flush_every_command: false,
        }
    }
}

/// Generates a session id of the form `session_<unix millis>`.
pub fn new_session_id() -> String {
    format!("session_{}", Utc::now().timestamp_millis())
}

/// One combat session with logging, persistence and event fan-out.
pub struct CombatRuntime {
    session: CombatSession,
    store: SessionStore,
    bus: EventBus,
    manifest: SessionManifest,
    config: RuntimeConfig,
    /// Nonce of a command that was applied but could not be logged.
    halted_at: Option<u64>,
}

impl CombatRuntime {
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    pub fn session(&self) -> &CombatSession {
        &self.session
    }

    pub fn session_id(&self) -> &str {
        &self.manifest.session_id
    }

    pub fn manifest(&self) -> &SessionManifest {
        &self.manifest
    }

    pub fn store(&mut self) -> &mut SessionStore {
        &mut self.store
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn subscribe(&self, topic: Topic) -> tokio::sync::broadcast::Receiver<Event> {
        self.bus.subscribe(topic)
    }

    /// Nonce of the command that halted the runtime, if any.
    pub fn halted_at(&self) -> Option<u64> {
        self.halted_at
    }

    /// Executes one command.
    ///
    /// Rejections are logged, recorded in the event log and published on
    /// [`Topic::Command`] before the error is returned; the session state is
    /// unchanged.
    ///
    /// The session applies a command before it is logged. If logging fails
    /// the in-memory state is ahead of `commands.log`, so the runtime halts
    /// and refuses every later command with [`RuntimeError::Halted`].
    pub fn execute(&mut self, command: &CombatCommand) -> Result<ExecutionOutcome> {
        if let Some(nonce) = self.halted_at {
            return Err(RuntimeError::Halted { nonce });
        }
        let nonce = self.session.state().nonce;
        let kind = command.kind();
        let phase = self.session.phase();
        tracing::debug!(session = %self.manifest.session_id, nonce, %kind, %phase, "executing command");

        let outcome = match self.session.execute(command) {
            Ok(outcome) => outcome,
            Err(err) => {
                self.reject(&err)?;
                return Err(err.into());
            }
        };

        if let Err(err) = self.record(nonce, command, &outcome) {
            tracing::error!(
                session = %self.manifest.session_id,
                nonce,
                %kind,
                "command applied but not logged, halting: {err}"
            );
            self.halted_at = Some(nonce);
            return Err(err);
        }

        let next = self.session.phase();
        if next != phase {
            tracing::info!(session = %self.manifest.session_id, from = %phase, to = %next, "combat phase changed");
        }
        if next == CombatPhase::Resolved {
            tracing::info!(
                session = %self.manifest.session_id,
                outcome = ?self.session.outcome(),
                fame = self.session.fame(),
                "combat ended"
            );
        }
        Ok(outcome)
    }

    fn record(&mut self, nonce: u64, command: &CombatCommand, outcome: &ExecutionOutcome) -> Result<()> {
        self.store.record_command(&CommandLogEntry {
            nonce,
            command: command.clone(),
            state_root: self.session.state().state_root()?,
        })?;

        for event in &outcome.events {
            self.emit(Event::Combat(CombatEventRecord {
                nonce,
                event: event.clone(),
            }))?;
        }
        self.emit(Event::Command(CommandEvent::Executed {
            nonce,
            kind: command.kind(),
            events: outcome.events.len(),
        }))?;

        if self.config.flush_every_command {
            self.store.flush()?;
        }
        Ok(())
    }

    /// Executes commands in order, stopping at the first rejection.
    pub fn run_script<'a>(
        &mut self,
        commands: impl IntoIterator<Item = &'a CombatCommand>,
    ) -> Result<usize> {
        let mut executed = 0;
        for command in commands {
            self.execute(command)?;
            executed += 1;
        }
        Ok(executed)
    }

    fn reject(&mut self, err: &ExecuteError) -> Result<()> {
        tracing::warn!(
            session = %self.manifest.session_id,
            nonce = err.nonce,
            kind = %err.kind,
            code = err.error_code(),
            severity = err.severity().as_str(),
            "command rejected: {}",
            err.error()
        );
        self.emit(Event::Command(CommandEvent::Rejected {
            nonce: err.nonce,
            kind: err.kind,
            code: err.error_code().to_owned(),
            severity: err.severity(),
            message: err.error().to_string(),
        }))
    }

    fn emit(&mut self, event: Event) -> Result<()> {
        self.store.record_event(&event)?;
        self.bus.publish(event);
        Ok(())
    }

    /// Writes the final snapshot and manifest, flushes the logs and returns
    /// the final manifest.
    ///
    /// A session may be closed before it is resolved; its manifest then has
    /// no outcome.
    pub fn close(mut self) -> Result<SessionManifest> {
        let state = self.session.state();
        let root = state.state_root()?;

        self.manifest.final_root = Some(hex::encode(root));
        self.manifest.outcome = state.outcome;
        self.manifest.fame = state.fame;
        self.manifest.commands = state.nonce;

        self.store.save_state(SessionFiles::FINAL_STATE, state)?;
        self.store.save_manifest(&self.manifest)?;

        let closed = SessionEvent::Closed {
            session_id: self.manifest.session_id.clone(),
            outcome: state.outcome,
            fame: state.fame,
            commands: state.nonce,
            state_root: root,
        };
        self.emit(Event::Session(closed))?;
        self.store.flush()?;

        tracing::info!(
            session = %self.manifest.session_id,
            commands = self.manifest.commands,
            outcome = ?self.manifest.outcome,
            "session closed"
        );
        Ok(self.manifest)
    }
}

/// Builder for [`CombatRuntime`].
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    session_id: Option<String>,
    scenario: Option<String>,
    catalog: Option<SessionCatalog>,
    store: Option<SessionStore>,
    bus: Option<EventBus>,
}

impl RuntimeBuilder {
    pub fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            session_id: None,
            scenario: None,
            catalog: None,
            store: None,
            bus: None,
        }
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Scenario name recorded in the manifest.
    pub fn scenario(mut self, name: impl Into<String>) -> Self {
        self.scenario = Some(name.into());
        self
    }

    /// Persist the session under `catalog`; without this the logs stay in
    /// memory.
    pub fn persist_to(mut self, catalog: SessionCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Record into a prepared store; takes precedence over [`Self::persist_to`].
    pub fn store(mut self, store: SessionStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Publish on an existing bus instead of creating one.
    pub fn event_bus(mut self, bus: EventBus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Wraps a freshly built session.
    ///
    /// Saves the initial snapshot and manifest and publishes
    /// [`SessionEvent::Opened`].
    pub fn build(self, session: CombatSession) -> Result<CombatRuntime> {
        let (session_id, store) = match self.store {
            Some(store) => (store.session_id().to_owned(), store),
            None => {
                let session_id = self.session_id.unwrap_or_else(new_session_id);
                let store = match &self.catalog {
                    Some(catalog) => SessionStore::create(catalog, &session_id)?,
                    None => SessionStore::in_memory(session_id.clone()),
                };
                (session_id, store)
            }
        };
        let bus = self
            .bus
            .unwrap_or_else(|| EventBus::with_capacity(self.config.event_buffer_size));

        let state = session.state();
        let enemies: Vec<_> = state
            .declared_enemies()
            .map(|enemy| enemy.definition.id.clone())
            .collect();
        let manifest = SessionManifest {
            session_id: session_id.clone(),
            created_at: Utc::now(),
            scenario: self.scenario,
            trigger: state.trigger,
            enemies: enemies.clone(),
            table_version: state.table_version,
            config: session.config().clone(),
            initial_root: hex::encode(state.state_root()?),
            final_root: None,
            outcome: None,
            fame: 0,
            commands: 0,
        };

        store.save_state(SessionFiles::INITIAL_STATE, state)?;
        store.save_manifest(&manifest)?;

        tracing::info!(
            session = %session_id,
            trigger = %state.trigger,
            table_version = state.table_version,
            enemies = enemies.len(),
            persistent = store.is_persistent(),
            "combat session opened"
        );

        let opened = SessionEvent::Opened {
            session_id,
            trigger: state.trigger,
            table_version: state.table_version,
            enemies,
        };
        let mut runtime = CombatRuntime {
            session,
            store,
            bus,
            manifest,
            config: self.config,
            halted_at: None,
        };
        runtime.emit(Event::Session(opened))?;
        Ok(runtime)
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
