//! Read-only collaborators handed to every command.

use crate::combat::WoundRules;
use crate::config::CombatConfig;

/// Bundles the configuration and rule hooks the command pipeline consults.
#[derive(Clone, Copy)]
pub struct CombatEnv<'a> {
    config: &'a CombatConfig,
    wounds: &'a dyn WoundRules,
}

impl<'a> CombatEnv<'a> {
    pub fn new(config: &'a CombatConfig, wounds: &'a dyn WoundRules) -> Self {
        Self { config, wounds }
    }

    pub fn config(&self) -> &'a CombatConfig {
        self.config
    }

    pub fn wounds(&self) -> &'a dyn WoundRules {
        self.wounds
    }
}

impl core::fmt::Debug for CombatEnv<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CombatEnv")
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}
