//! Enemy table loader.

use std::path::Path;

use anyhow::Context;
use combat_core::{EnemyDefinition, EnemyRegistry};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Enemy table structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyTable {
    /// Bumped whenever a definition changes; recorded by every session.
    pub version: u32,
    pub enemies: Vec<EnemyDefinition>,
}

/// Loader for the enemy table from RON files.
pub struct EnemyLoader;

impl EnemyLoader {
    /// Load and validate the enemy table.
    ///
    /// Duplicate ids, zero attacks or armor and dangling `summons` references
    /// are rejected.
    pub fn load(path: &Path) -> LoadResult<EnemyRegistry> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<EnemyRegistry> {
        let table: EnemyTable = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse enemy table RON: {}", e))?;

        let count = table.enemies.len();
        let registry = EnemyRegistry::from_definitions(table.version, table.enemies)
            .context("invalid enemy table")?;

        tracing::debug!(version = table.version, count, "enemy table loaded");
        Ok(registry)
    }
}
