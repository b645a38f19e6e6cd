//! Hit resolution.
//!
//! An attack lands when `roll ∈ [0, hit + dodge)` falls below `hit`, so the
//! success probability is `hit / (hit + dodge)`: it rises continuously with
//! accuracy and never saturates while both ratings are positive.

use super::dice::Dice;

/// Probability that an attack with `hit` lands against `dodge`.
pub fn hit_chance(hit: u32, dodge: u32) -> f64 {
    let total = u64::from(hit) + u64::from(dodge);
    if total == 0 {
        return 1.0;
    }
    hit as f64 / total as f64
}

/// Rolls one hit check. Two zero ratings always hit.
pub fn roll_hit(dice: &mut Dice<'_>, hit: u32, dodge: u32) -> bool {
    let total = hit.saturating_add(dodge);
    if total == 0 {
        return true;
    }
    dice.below(total) < hit
}
