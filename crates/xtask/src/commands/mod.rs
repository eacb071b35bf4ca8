//! Command implementations for xtask
//!
//! Each command is a separate module that implements its own CLI args and execution logic.

mod clean;
mod read_events;
mod replay;
mod sessions;
mod simulate;

pub use clean::Clean;
pub use read_events::ReadEvents;
pub use replay::Replay;
pub use sessions::Sessions;
pub use simulate::Simulate;
