//! Repository contracts for the append-only session logs.

use crate::events::Event;
use crate::repository::Result;
use crate::repository::types::CommandLogEntry;

/// Append-only log of every published [`Event`], including rejections.
pub trait EventRepository: Send {
    /// Append an event to the log
    ///
    /// Returns the offset where the event was written.
    fn append(&mut self, event: &Event) -> Result<u64>;

    /// Returns `None` past the end of the log, otherwise the event and the
    /// offset of the next entry.
    fn read_at_offset(&self, offset: u64) -> Result<Option<(Event, u64)>>;

    fn flush(&mut self) -> Result<()>;

    fn size(&self) -> Result<u64>;

    /// Name of the log inside its session (e.g. `events.log`)
    fn name(&self) -> &str;
}

/// Append-only log of executed commands, the input to replay.
pub trait CommandRepository: Send {
    fn append(&mut self, entry: &CommandLogEntry) -> Result<u64>;

    fn read_at_offset(&self, offset: u64) -> Result<Option<(CommandLogEntry, u64)>>;

    fn flush(&mut self) -> Result<()>;

    fn size(&self) -> Result<u64>;

    fn name(&self) -> &str;
}
