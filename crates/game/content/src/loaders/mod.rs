//! Content loaders for reading combat data from files.
//!
//! Each loader turns one RON or TOML file into combat-core types.

pub mod config;
pub mod enemies;
pub mod factory;
pub mod scenario;

pub use config::ConfigLoader;
pub use enemies::{EnemyLoader, EnemyTable};
pub use factory::ContentFactory;
pub use scenario::{Scenario, ScenarioLoader, ScriptStep, ScriptTarget};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    tracing::debug!(path = %path.display(), "reading content file");
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
