use crate::state::{Character, SkillCategory};

/// Effective proficiency of `character` in `category`.
///
/// The enabled advanced skill is clamped to the base level and layered on top
/// of half the base: `advanced + base / 2`. Without an advanced skill the
/// entity still gets `base / 2`.
pub fn effective_level(character: &Character, category: SkillCategory) -> u32 {
    let base = character.skills.base_level(category);
    let advanced = character
        .enabled
        .get(category)
        .filter(|id| SkillCategory::from_skill_id(id) != Some(category))
        .map(|id| character.skills.level(id.as_str()).min(base))
        .unwrap_or(0);

    advanced + base / 2
}
