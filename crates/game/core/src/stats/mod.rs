//! Derived combat numbers.
//!
//! Nothing here is cached: equipment and skills can change between rounds,
//! so callers derive fresh stats every time they need them.
//!
//! - [`effective_level`]: base skill plus the enabled advanced variant
//! - [`derive_stats`]: attributes, gear and proficiency folded into
//!   [`CombatStats`]
//! - [`combat_power`] / [`entity_level`]: coarse strength measures used for
//!   difficulty ratios and rewards
mod derived;
mod power;
mod proficiency;

pub use derived::{CombatStats, derive_stats};
pub use power::{combat_power, difficulty_ratio, entity_level};
pub use proficiency::effective_level;
