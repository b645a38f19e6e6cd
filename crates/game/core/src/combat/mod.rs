//! Strike resolution.
//!
//! Pure functions shared by the per-tick round and by techniques:
//!
//! - [`roll_hit`]: overlapping hit/dodge distributions
//! - [`roll_damage`]: power difference, jitter, floor and sparring halving
//! - [`force_burst`]: enforce overdrive converting force into bonus damage
//! - [`resolve_attack`]: hit check followed by damage
//! - [`HealthBand`]: low-health narration thresholds
pub mod damage;
pub mod dice;
pub mod hit;
pub mod result;
pub mod status;

pub use damage::{ForceBurst, StrikeBonus, force_burst, roll_damage, sparring_damage, technique_damage};
pub use dice::Dice;
pub use hit::{hit_chance, roll_hit};
pub use result::{AttackOutcome, AttackResult, resolve_attack};
pub use status::HealthBand;
