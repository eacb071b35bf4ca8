/// Which wound conversion rules a session uses.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum WoundRulesKind {
    /// One wound per unblocked attack, regardless of its value.
    #[default]
    Flat,
    /// Wounds = ceil(damage / hero armor).
    Armor,
}

/// Combat configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Wounds taken to hand during one combat that knock the hero out.
    pub knockout_threshold: u32,

    /// Wound conversion rules used by the damage distributor.
    pub wound_rules: WoundRulesKind,

    /// Hero armor, only consulted by [`WoundRulesKind::Armor`].
    pub hero_armor: u32,

    /// Upper bound on enemy tokens declared into a single combat.
    pub max_enemies: usize,
}

impl CombatConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of independent attacks on one enemy definition.
    pub const MAX_ATTACKS_PER_ENEMY: usize = 4;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_KNOCKOUT_THRESHOLD: u32 = 5;
    pub const DEFAULT_HERO_ARMOR: u32 = 2;
    pub const DEFAULT_MAX_ENEMIES: usize = 8;

    pub fn new() -> Self {
        Self {
            knockout_threshold: Self::DEFAULT_KNOCKOUT_THRESHOLD,
            wound_rules: WoundRulesKind::Flat,
            hero_armor: Self::DEFAULT_HERO_ARMOR,
            max_enemies: Self::DEFAULT_MAX_ENEMIES,
        }
    }

    pub fn with_knockout_threshold(mut self, knockout_threshold: u32) -> Self {
        self.knockout_threshold = knockout_threshold;
        self
    }

    pub fn with_armor_wounds(mut self, hero_armor: u32) -> Self {
        self.wound_rules = WoundRulesKind::Armor;
        self.hero_armor = hero_armor;
        self
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}
