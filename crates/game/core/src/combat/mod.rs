//! Ability resolver.
//!
//! Pure, stateless functions mapping an enemy's ability and resistance flags
//! plus the current phase to modified thresholds. Nothing here touches
//! session state; commands call these to validate and to compute values.
//!
//! # Core Functions
//!
//! - `is_fortified`: fortified unless also unfortified
//! - `required_block`: attack value, doubled for swift
//! - `attack_eligibility`: which contribution types may hit an enemy in a phase
//! - `block_efficiency` / `attack_efficiency`: full or halved strength
//! - [`WoundRules`]: wound conversion hooks for poison, paralyze and brutal

pub mod abilities;
pub mod efficiency;
pub mod wounds;

pub use abilities::{Eligibility, attack_eligibility, is_fortified, required_block};
pub use efficiency::{Efficiency, Tally, attack_efficiency, block_efficiency};
pub use wounds::{
    ArmorWoundRules, FlatWoundRules, HeroWounds, Hit, WoundRules, wound_rules_for,
};
