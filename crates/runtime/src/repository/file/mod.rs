//! File-backed repositories.

mod log;
mod session;

pub use log::{FileCommandLog, FileEventLog, FileRepository};
pub use session::{SessionCatalog, SessionFiles};
