//! Combat configuration loader.

use std::path::Path;

use combat_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for combat configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys fall back to [`CombatConfig::default`].
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.max_enemies == 0 {
            anyhow::bail!("max_enemies must be at least 1");
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::WoundRulesKind;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = ConfigLoader::parse("wound_rules = \"armor\"\nhero_armor = 3\n").unwrap();

        assert_eq!(config.wound_rules, WoundRulesKind::Armor);
        assert_eq!(config.hero_armor, 3);
        assert_eq!(
            config.knockout_threshold,
            CombatConfig::DEFAULT_KNOCKOUT_THRESHOLD
        );
    }

    #[test]
    fn rejects_zero_enemy_cap() {
        assert!(ConfigLoader::parse("max_enemies = 0").is_err());
    }
}
