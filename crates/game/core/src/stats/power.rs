use crate::env::Env;
use crate::state::{Character, SkillCategory};

use super::derived::CombatStats;

/// Coarse strength measure: `(attack + defense) × 2 + health`.
pub fn combat_power(stats: &CombatStats, health: u32) -> f64 {
    (f64::from(stats.attack_power) + f64::from(stats.defense_power)) * 2.0 + f64::from(health)
}

/// Opponent power relative to the player's. A powerless player makes every
/// opponent count as a full match.
pub fn difficulty_ratio(opponent_power: f64, player_power: f64) -> f64 {
    if player_power <= 0.0 {
        return 1.0;
    }
    opponent_power / player_power
}

/// Highest martial skill level plus highest force skill level.
///
/// Skills whose category cannot be resolved are ignored.
pub fn entity_level(character: &Character, env: &Env<'_>) -> u32 {
    let skills = env.skills();
    let mut martial = 0;
    let mut force = 0;
    for (id, level) in character.skills.iter() {
        match skills.category_of(id) {
            Some(SkillCategory::Force) => force = force.max(level),
            Some(category) if category.is_martial() => martial = martial.max(level),
            _ => {}
        }
    }
    martial + force
}
