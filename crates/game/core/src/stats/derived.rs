use crate::config::StatCoefficients;
use crate::env::Env;
use crate::state::{Character, SkillCategory};

use super::proficiency::effective_level;

/// Combat statistics derived from a snapshot at the moment of computation.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatStats {
    pub attack_power: u32,
    pub defense_power: u32,
    pub hit_rating: u32,
    pub dodge_rating: u32,
    /// Effective level of the attack-type skill.
    pub attack_skill: u32,
    /// Weapon category in hand, `unarmed` when empty-handed.
    pub attack_type: SkillCategory,
    pub force_level: u32,
    pub dodge_level: u32,
}

/// Folds attributes, equipment and proficiency into [`CombatStats`].
///
/// Worn items add their flat attribute bonuses before any term is computed.
/// Items without a definition contribute nothing.
pub fn derive_stats(character: &Character, env: &Env<'_>, coeffs: &StatCoefficients) -> CombatStats {
    let items = env.items();
    let mut attributes = character.attributes;
    let mut armor = 0i64;

    for (_, item) in character.equipment.armor() {
        if let Some(def) = items.definition(item) {
            armor += i64::from(def.defense);
            attributes.add(&def.props);
        }
    }

    let weapon = character.equipment.weapon().and_then(|id| items.definition(id));
    let (attack_type, weapon_damage, weapon_hit) = match &weapon {
        Some(def) => (
            def.weapon.unwrap_or(SkillCategory::Unarmed),
            f64::from(def.damage),
            f64::from(def.hit),
        ),
        None => (SkillCategory::Unarmed, 0.0, 0.0),
    };

    let attack_skill = effective_level(character, attack_type);
    let force_level = effective_level(character, SkillCategory::Force);
    let dodge_level = effective_level(character, SkillCategory::Dodge);

    let attack_rating = rating(character, env, attack_type, |def| def.damage_rating);
    let dodge_rating = rating(character, env, SkillCategory::Dodge, |def| def.dodge_rating);

    let attack = f64::from(attack_skill);
    let force = f64::from(force_level);
    let dodge = f64::from(dodge_level);

    let attack_power = f64::from(attributes.str) * coeffs.ap_str
        + attack * attack_rating * coeffs.ap_skill
        + force * coeffs.ap_force
        + weapon_damage;
    let defense_power = f64::from(attributes.con) * coeffs.dp_con
        + force * coeffs.dp_force
        + dodge * dodge_rating * coeffs.dp_dodge
        + armor as f64;
    let hit_rating = f64::from(attributes.per) * coeffs.hit_per
        + attack * attack_rating * coeffs.hit_skill
        + weapon_hit;
    let evasion = f64::from(attributes.per) * coeffs.dodge_per
        + dodge * dodge_rating * coeffs.dodge_skill
        + attack * coeffs.parry;

    CombatStats {
        attack_power: non_negative(attack_power),
        defense_power: non_negative(defense_power),
        hit_rating: non_negative(hit_rating),
        dodge_rating: non_negative(evasion),
        attack_skill,
        attack_type,
        force_level,
        dodge_level,
    }
}

/// Rating of the skill governing `category`: the enabled advanced skill's
/// definition, else the base category's, else 1.0.
fn rating(
    character: &Character,
    env: &Env<'_>,
    category: SkillCategory,
    pick: impl Fn(&crate::env::SkillDefinition) -> f64,
) -> f64 {
    let skills = env.skills();
    character
        .enabled
        .get(category)
        .and_then(|id| skills.skill(id))
        .or_else(|| skills.skill(&category.skill_id()))
        .map(|def| pick(&def))
        .unwrap_or(1.0)
}

fn non_negative(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.floor().min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}
