//! Per-session persistence used by the runtime.

use combat_core::CombatState;

use crate::events::Event;
use crate::repository::file::{FileRepository, SessionCatalog, SessionFiles};
use crate::repository::memory::MemoryLog;
use crate::repository::traits::{CommandRepository, EventRepository};
use crate::repository::types::{CommandLogEntry, SessionManifest};
use crate::repository::{RepositoryError, Result};

/// Logs and snapshots of one running session.
///
/// A store is either backed by a session directory or held in memory; the
/// in-memory variant skips manifests and snapshots.
pub struct SessionStore {
    session_id: String,
    files: Option<SessionFiles>,
    commands: Box<dyn CommandRepository>,
    events: Box<dyn EventRepository>,
}

impl SessionStore {
    /// Creates a new session directory under `catalog`.
    ///
    /// Fails with [`RepositoryError::LogAlreadyExists`] if the session was
    /// saved before.
    pub fn create(catalog: &SessionCatalog, session_id: &str) -> Result<Self> {
        let files = catalog.session(session_id);
        let commands = FileRepository::<CommandLogEntry>::create(files.dir(), SessionFiles::COMMANDS)?;
        let events = FileRepository::<Event>::create(files.dir(), SessionFiles::EVENTS)?;

        tracing::debug!(session_id, dir = %files.dir().display(), "created session store");
        Ok(Self {
            session_id: session_id.to_owned(),
            files: Some(files),
            commands: Box::new(commands),
            events: Box::new(events),
        })
    }

    pub fn in_memory(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            files: None,
            commands: Box::new(MemoryLog::<CommandLogEntry>::new(SessionFiles::COMMANDS)),
            events: Box::new(MemoryLog::<Event>::new(SessionFiles::EVENTS)),
        }
    }

    /// Unpersisted store over caller-provided logs.
    pub fn with_logs(
        session_id: impl Into<String>,
        commands: Box<dyn CommandRepository>,
        events: Box<dyn EventRepository>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            files: None,
            commands,
            events,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn files(&self) -> Option<&SessionFiles> {
        self.files.as_ref()
    }

    pub fn is_persistent(&self) -> bool {
        self.files.is_some()
    }

    pub fn record_command(&mut self, entry: &CommandLogEntry) -> Result<u64> {
        self.commands.append(entry)
    }

    pub fn record_event(&mut self, event: &Event) -> Result<u64> {
        self.events.append(event)
    }

    pub fn save_manifest(&self, manifest: &SessionManifest) -> Result<()> {
        match &self.files {
            Some(files) => files.save_manifest(manifest),
            None => Ok(()),
        }
    }

    pub fn save_state(&self, name: &str, state: &CombatState) -> Result<()> {
        match &self.files {
            Some(files) => files.save_state(name, state),
            None => Ok(()),
        }
    }

    pub fn flush(&mut self) -> Result<()> {
        self.commands.flush()?;
        self.events.flush()
    }

    /// Every command recorded so far.
    pub fn commands(&mut self) -> Result<Vec<CommandLogEntry>> {
        self.commands.flush()?;
        let log = &*self.commands;
        collect(|offset| log.read_at_offset(offset))
    }

    /// Every event recorded so far.
    pub fn events(&mut self) -> Result<Vec<Event>> {
        self.events.flush()?;
        let log = &*self.events;
        collect(|offset| log.read_at_offset(offset))
    }
}

fn collect<T>(read: impl Fn(u64) -> Result<Option<(T, u64)>>) -> Result<Vec<T>> {
    let mut items = Vec::new();
    let mut offset = 0;
    while let Some((item, next)) = read(offset)? {
        if next <= offset {
            return Err(RepositoryError::CorruptedData(format!(
                "log offset did not advance past {offset}"
            )));
        }
        items.push(item);
        offset = next;
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::CommandEvent;
    use combat_core::{AdvancePhase, CommandKind, StartCombat};

    fn entry(nonce: u64) -> CommandLogEntry {
        CommandLogEntry {
            nonce,
            command: if nonce == 0 {
                StartCombat.into()
            } else {
                AdvancePhase.into()
            },
            state_root: [nonce as u8; 32],
        }
    }

    fn event(nonce: u64) -> Event {
        Event::Command(CommandEvent::Executed {
            nonce,
            kind: CommandKind::Start,
            events: 1,
        })
    }

    #[test]
    fn memory_and_file_stores_read_back_the_same() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = SessionCatalog::new(dir.path());

        let mut stores = [
            SessionStore::in_memory("session_mem"),
            SessionStore::create(&catalog, "session_file").unwrap(),
        ];
        for store in &mut stores {
            store.record_command(&entry(0)).unwrap();
            store.record_command(&entry(1)).unwrap();
            store.record_event(&event(0)).unwrap();

            assert_eq!(store.commands().unwrap(), vec![entry(0), entry(1)]);
            assert_eq!(store.events().unwrap(), vec![event(0)]);
        }
        assert!(!stores[0].is_persistent());
        assert!(stores[1].is_persistent());
    }

    #[test]
    fn session_cannot_be_created_twice() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = SessionCatalog::new(dir.path());

        let _first = SessionStore::create(&catalog, "session_1").unwrap();
        assert!(matches!(
            SessionStore::create(&catalog, "session_1"),
            Err(RepositoryError::LogAlreadyExists(_))
        ));
    }
}
