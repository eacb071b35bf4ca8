//! Enemy registry: the static, versioned enemy table.

use std::collections::BTreeMap;

use crate::error::{ErrorSeverity, GameError};
use crate::types::EnemyTypeId;

use super::{Abilities, EnemyDefinition};

/// Read-only access to enemy definitions.
///
/// Sessions read definitions once at creation; nothing in the engine keeps
/// a reference to the oracle afterwards.
pub trait EnemyOracle {
    /// Version of the enemy table, recorded for replay.
    fn version(&self) -> u32;

    fn definition(&self, id: &EnemyTypeId) -> Option<&EnemyDefinition>;
}

/// Errors raised while building the enemy table.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("enemy '{0}' is defined more than once")]
    Duplicate(EnemyTypeId),

    #[error("enemy '{id}' has an attack of value 0")]
    ZeroAttack { id: EnemyTypeId },

    #[error("enemy '{id}' has armor 0")]
    ZeroArmor { id: EnemyTypeId },

    #[error("enemy '{id}' lists summons but lacks the summon ability")]
    SummonsWithoutAbility { id: EnemyTypeId },

    #[error("enemy '{id}' summons unknown enemy '{summons}'")]
    UnknownSummon {
        id: EnemyTypeId,
        summons: EnemyTypeId,
    },

    #[error("enemy '{id}' summons '{summons}', which is itself a summoner")]
    NestedSummon {
        id: EnemyTypeId,
        summons: EnemyTypeId,
    },
}

impl GameError for RegistryError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        use RegistryError::*;
        match self {
            Duplicate(_) => "REGISTRY_DUPLICATE",
            ZeroAttack { .. } => "REGISTRY_ZERO_ATTACK",
            ZeroArmor { .. } => "REGISTRY_ZERO_ARMOR",
            SummonsWithoutAbility { .. } => "REGISTRY_SUMMONS_WITHOUT_ABILITY",
            UnknownSummon { .. } => "REGISTRY_UNKNOWN_SUMMON",
            NestedSummon { .. } => "REGISTRY_NESTED_SUMMON",
        }
    }
}

/// In-memory enemy table keyed by type id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyRegistry {
    version: u32,
    definitions: BTreeMap<EnemyTypeId, EnemyDefinition>,
}

impl EnemyRegistry {
    pub fn new(version: u32) -> Self {
        Self {
            version,
            definitions: BTreeMap::new(),
        }
    }

    /// Builds and validates a registry from a list of definitions.
    pub fn from_definitions(
        version: u32,
        definitions: impl IntoIterator<Item = EnemyDefinition>,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::new(version);
        for definition in definitions {
            registry.insert(definition)?;
        }
        registry.validate_summons()?;
        Ok(registry)
    }

    /// Inserts one definition after checking its own fields.
    ///
    /// Cross-references (`summons`) are checked by [`Self::validate_summons`].
    pub fn insert(&mut self, definition: EnemyDefinition) -> Result<(), RegistryError> {
        let id = definition.id.clone();
        if self.definitions.contains_key(&id) {
            return Err(RegistryError::Duplicate(id));
        }
        if definition.attacks.iter().any(|attack| attack.value == 0) {
            return Err(RegistryError::ZeroAttack { id });
        }
        if definition.armor == 0 {
            return Err(RegistryError::ZeroArmor { id });
        }
        if definition.summons.is_some() && !definition.has(Abilities::SUMMON) {
            return Err(RegistryError::SummonsWithoutAbility { id });
        }
        self.definitions.insert(id, definition);
        Ok(())
    }

    /// Every `summons` reference must resolve to a non-summoner definition.
    pub fn validate_summons(&self) -> Result<(), RegistryError> {
        for definition in self.definitions.values() {
            let Some(summons) = &definition.summons else {
                continue;
            };
            let target = self.definitions.get(summons).ok_or_else(|| {
                RegistryError::UnknownSummon {
                    id: definition.id.clone(),
                    summons: summons.clone(),
                }
            })?;
            if target.has(Abilities::SUMMON) {
                return Err(RegistryError::NestedSummon {
                    id: definition.id.clone(),
                    summons: summons.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EnemyDefinition> {
        self.definitions.values()
    }
}

impl EnemyOracle for EnemyRegistry {
    fn version(&self) -> u32 {
        self.version
    }

    fn definition(&self, id: &EnemyTypeId) -> Option<&EnemyDefinition> {
        self.definitions.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_duplicates_and_zero_values() {
        let mut registry = EnemyRegistry::new(1);
        registry
            .insert(EnemyDefinition::new("prowlers", 4, 3, 2))
            .unwrap();

        assert_eq!(
            registry.insert(EnemyDefinition::new("prowlers", 4, 3, 2)),
            Err(RegistryError::Duplicate("prowlers".into()))
        );
        assert!(matches!(
            registry.insert(EnemyDefinition::new("ghost", 0, 3, 2)),
            Err(RegistryError::ZeroAttack { .. })
        ));
        assert!(matches!(
            registry.insert(EnemyDefinition::new("ghost", 1, 0, 2)),
            Err(RegistryError::ZeroArmor { .. })
        ));
    }

    #[test]
    fn summons_must_resolve_to_plain_enemies() {
        let summoner = EnemyDefinition::new("orc_summoners", 1, 4, 4).with_summons("prowlers");

        let missing = EnemyRegistry::from_definitions(1, [summoner.clone()]);
        assert!(matches!(missing, Err(RegistryError::UnknownSummon { .. })));

        let ok = EnemyRegistry::from_definitions(
            1,
            [summoner, EnemyDefinition::new("prowlers", 4, 3, 2)],
        )
        .unwrap();
        assert_eq!(ok.len(), 2);
        assert_eq!(ok.version(), 1);
        assert!(ok.definition(&"prowlers".into()).is_some());
    }
}
