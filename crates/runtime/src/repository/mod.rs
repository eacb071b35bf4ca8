//! Repository layer for saved combat sessions.
//!
//! A session directory holds:
//! - `manifest.json`: setup, config and final summary
//! - `initial.state` / `final.state`: bincode snapshots
//! - `commands.log`: executed commands with the state root after each
//! - `events.log`: every published event, in order
//!
//! Static content (enemy table, scenarios) lives in `combat-content`, not here.

mod error;
mod file;
mod memory;
mod store;
mod traits;
mod types;

pub use error::{RepositoryError, Result};
pub use file::{FileCommandLog, FileEventLog, FileRepository, SessionCatalog, SessionFiles};
pub use memory::MemoryLog;
pub use store::SessionStore;
pub use traits::{CommandRepository, EventRepository};
pub use types::{CommandLogEntry, SessionManifest};
