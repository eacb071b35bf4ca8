//! Topic-based event routing for combat sessions.
//!
//! Every successful command fans its domain events out on
//! [`Topic::Combat`]; command outcomes and session lifecycle have their own
//! topics so observers can subscribe to just what they render.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{CombatEventRecord, CommandEvent, SessionEvent};
