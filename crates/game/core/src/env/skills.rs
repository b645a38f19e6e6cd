use crate::state::{SkillCategory, SkillId};

/// Static skill definition.
///
/// Base skills (`"sword"`, `"dodge"`) may omit a definition entirely; every
/// lookup then falls back to neutral ratings.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SkillDefinition {
    pub name: String,
    /// Base category this skill specialises.
    pub category: SkillCategory,
    /// Multiplier on the attack terms when this skill governs the attack.
    pub damage_rating: f64,
    /// Multiplier on the evasion terms when this skill governs dodge.
    pub dodge_rating: f64,
    /// Flat damage of the skill's ordinary strikes before proficiency scaling.
    pub base_damage: u32,
    /// Narration lines for ordinary attacks. `$N` is the attacker, `$n` the
    /// defender; rendering is left to the presentation layer.
    pub attack_messages: Vec<String>,
}

impl SkillDefinition {
    pub fn new(name: impl Into<String>, category: SkillCategory) -> Self {
        Self {
            name: name.into(),
            category,
            ..Self::default()
        }
    }

    pub fn with_ratings(mut self, damage_rating: f64, dodge_rating: f64) -> Self {
        self.damage_rating = damage_rating;
        self.dodge_rating = dodge_rating;
        self
    }

    pub fn with_base_damage(mut self, base_damage: u32) -> Self {
        self.base_damage = base_damage;
        self
    }
}

impl Default for SkillDefinition {
    fn default() -> Self {
        Self {
            name: String::new(),
            category: SkillCategory::Unarmed,
            damage_rating: 1.0,
            dodge_rating: 1.0,
            base_damage: 0,
            attack_messages: Vec::new(),
        }
    }
}

/// Oracle providing skill definitions.
pub trait SkillOracle: Send + Sync {
    fn skill(&self, id: &SkillId) -> Option<SkillDefinition>;

    /// Base category of a skill id: base skills name their category, advanced
    /// skills declare it in their definition.
    fn category_of(&self, id: &SkillId) -> Option<SkillCategory> {
        SkillCategory::from_skill_id(id).or_else(|| self.skill(id).map(|def| def.category))
    }
}
