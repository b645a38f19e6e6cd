//! Skill categories, learned proficiency levels, and the enabled-skill map.

use std::collections::BTreeMap;

use super::ids::SkillId;

/// Base skill categories.
///
/// The martial categories double as weapon categories: a sword item trains
/// and is governed by `sword`, and having no weapon means `unarmed`.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SkillCategory {
    Unarmed,
    Sword,
    Blade,
    Staff,
    Whip,
    Dagger,
    Force,
    Dodge,
}

impl SkillCategory {
    /// Attack categories (unarmed and the weapon families).
    pub const fn is_martial(self) -> bool {
        !matches!(self, Self::Force | Self::Dodge)
    }

    /// Id under which the base skill of this category is stored.
    pub fn skill_id(self) -> SkillId {
        SkillId::new(self.as_ref())
    }

    /// Parses a skill id that names a base category.
    pub fn from_skill_id(id: &SkillId) -> Option<Self> {
        id.as_str().parse().ok()
    }
}

/// Learned skills and their proficiency levels. Levels grow without bound.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SkillBook(BTreeMap<SkillId, u32>);

impl SkillBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Level of a skill, 0 when it has never been learned.
    pub fn level(&self, id: &str) -> u32 {
        self.0.get(id).copied().unwrap_or(0)
    }

    /// Level of the base skill of `category`.
    pub fn base_level(&self, category: SkillCategory) -> u32 {
        self.level(category.as_ref())
    }

    pub fn has(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    pub fn set(&mut self, id: impl Into<SkillId>, level: u32) {
        self.0.insert(id.into(), level);
    }

    /// Builder-style [`SkillBook::set`].
    pub fn with(mut self, id: impl Into<SkillId>, level: u32) -> Self {
        self.set(id, level);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SkillId, u32)> {
        self.0.iter().map(|(id, level)| (id, *level))
    }

    /// Lowers every skill of level ≥ 1 by exactly one.
    ///
    /// Returns how many skills were reduced.
    pub fn decrement_all(&mut self) -> usize {
        let mut reduced = 0;
        for level in self.0.values_mut().filter(|level| **level >= 1) {
            *level -= 1;
            reduced += 1;
        }
        reduced
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<SkillId>> FromIterator<(K, u32)> for SkillBook {
    fn from_iter<T: IntoIterator<Item = (K, u32)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(id, level)| (id.into(), level)).collect())
    }
}

/// Capability selection: which advanced skill the entity actively uses for
/// each base category. Absent keys mean "no advanced skill selected".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct EnabledSkills(BTreeMap<SkillCategory, SkillId>);

impl EnabledSkills {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: SkillCategory) -> Option<&SkillId> {
        self.0.get(&category)
    }

    pub fn enable(&mut self, category: SkillCategory, skill: impl Into<SkillId>) {
        self.0.insert(category, skill.into());
    }

    /// Builder-style [`EnabledSkills::enable`].
    pub fn with(mut self, category: SkillCategory, skill: impl Into<SkillId>) -> Self {
        self.enable(category, skill);
        self
    }

    pub fn disable(&mut self, category: SkillCategory) -> Option<SkillId> {
        self.0.remove(&category)
    }

    /// True when `skill` is the active selection for some category.
    pub fn is_active(&self, skill: &SkillId) -> bool {
        self.0.values().any(|enabled| enabled == skill)
    }

    /// The skill that governs `category`: the enabled advanced skill, or the
    /// bare base skill when none is selected.
    pub fn governing(&self, category: SkillCategory) -> SkillId {
        self.get(category)
            .cloned()
            .unwrap_or_else(|| category.skill_id())
    }

    pub fn iter(&self) -> impl Iterator<Item = (SkillCategory, &SkillId)> {
        self.0.iter().map(|(category, id)| (*category, id))
    }
}
