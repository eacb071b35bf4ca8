//! In-memory logs for sessions that are not persisted.

use crate::events::Event;
use crate::repository::Result;
use crate::repository::traits::{CommandRepository, EventRepository};
use crate::repository::types::CommandLogEntry;

/// Log kept in a `Vec`; offsets are entry indices.
#[derive(Debug, Clone)]
pub struct MemoryLog<T> {
    name: String,
    entries: Vec<T>,
}

impl<T: Clone> MemoryLog<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    fn push(&mut self, item: &T) -> u64 {
        self.entries.push(item.clone());
        (self.entries.len() - 1) as u64
    }

    fn get(&self, offset: u64) -> Option<(T, u64)> {
        let index = usize::try_from(offset).ok()?;
        self.entries
            .get(index)
            .map(|item| (item.clone(), offset + 1))
    }
}

impl EventRepository for MemoryLog<Event> {
    fn append(&mut self, event: &Event) -> Result<u64> {
        Ok(self.push(event))
    }

    fn read_at_offset(&self, offset: u64) -> Result<Option<(Event, u64)>> {
        Ok(self.get(offset))
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn size(&self) -> Result<u64> {
        Ok(self.entries.len() as u64)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl CommandRepository for MemoryLog<CommandLogEntry> {
    fn append(&mut self, entry: &CommandLogEntry) -> Result<u64> {
        Ok(self.push(entry))
    }

    fn read_at_offset(&self, offset: u64) -> Result<Option<(CommandLogEntry, u64)>> {
        Ok(self.get(offset))
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn size(&self) -> Result<u64> {
        Ok(self.entries.len() as u64)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
