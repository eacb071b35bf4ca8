//! Data-driven combat content and loaders.
//!
//! This crate provides loaders for RON/TOML data files:
//! - Enemy table (versioned, data-driven via RON)
//! - Combat configuration (data-driven via TOML)
//! - Scripted combat scenarios (data-driven via RON)
//!
//! Content is read once when a session is created and never appears in
//! combat state except as copied definitions.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentFactory, EnemyLoader, EnemyTable, Scenario, ScenarioLoader, ScriptStep,
    ScriptTarget,
};
