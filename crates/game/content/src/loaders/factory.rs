//! Content factory for loading combat content from a data directory.

use std::path::{Path, PathBuf};

use combat_core::{CombatConfig, EnemyRegistry};

use crate::loaders::{ConfigLoader, EnemyLoader, LoadResult, Scenario, ScenarioLoader};

/// Content factory that loads all combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── enemies.ron
/// └── scenarios/
///     ├── orc_ambush.ron
///     └── summoner_den.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Environment variable overriding the data directory.
    pub const DATA_DIR_ENV: &'static str = "CONTENT_DATA_DIR";

    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Uses `CONTENT_DATA_DIR` when set, otherwise the data shipped with
    /// this crate.
    pub fn from_env() -> Self {
        let data_dir = std::env::var_os(Self::DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(Self::bundled_data_dir);
        Self::new(data_dir)
    }

    pub fn bundled_data_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("data")
    }

    /// Load combat configuration from `config.toml`.
    ///
    /// A missing file yields the default configuration.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(CombatConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the enemy table from `enemies.ron`.
    pub fn load_enemies(&self) -> LoadResult<EnemyRegistry> {
        let path = self.data_dir.join("enemies.ron");
        EnemyLoader::load(&path)
    }

    /// Load a scenario from `scenarios/{name}.ron`.
    pub fn load_scenario(&self, name: &str) -> LoadResult<Scenario> {
        let path = self.scenarios_dir().join(format!("{}.ron", name));
        ScenarioLoader::load(&path)
    }

    /// Names of all scenarios, sorted.
    pub fn scenario_names(&self) -> LoadResult<Vec<String>> {
        let dir = self.scenarios_dir();
        let entries = std::fs::read_dir(&dir)
            .map_err(|e| anyhow::anyhow!("Failed to read directory {}: {}", dir.display(), e))?;

        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_none_or(|ext| ext != "ron") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    fn scenarios_dir(&self) -> PathBuf {
        self.data_dir.join("scenarios")
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ContentFactory::new(dir.path());
        assert_eq!(factory.load_config().unwrap(), CombatConfig::default());
    }
}
