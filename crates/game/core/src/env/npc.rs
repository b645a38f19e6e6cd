//! NPC template definitions and oracle interface.
//!
//! A template describes every instance of one kind of opponent. The room
//! roster decides how many instances exist; [`NpcTemplate::to_character`]
//! turns the template into the snapshot an engagement entry carries.

use crate::state::{
    Attributes, Character, CharacterState, EnabledSkills, Equipment, ItemId, OpponentKey,
    Resources, SkillBook, TemplateId,
};

/// One independent loot roll.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LootDrop {
    pub item: ItemId,
    /// Probability in `[0, 1]`.
    pub rate: f64,
}

impl LootDrop {
    pub fn new(item: impl Into<ItemId>, rate: f64) -> Self {
        Self {
            item: item.into(),
            rate,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NpcTemplate {
    pub name: String,
    pub attributes: Attributes,
    pub skills: SkillBook,
    pub enabled: EnabledSkills,
    pub equipment: Equipment,
    pub max_health: u32,
    pub max_force: u32,
    pub enforce: u8,
    /// Attacks players entering its room.
    pub aggressive: bool,
    pub loot: Vec<LootDrop>,
}

impl Default for NpcTemplate {
    fn default() -> Self {
        Self {
            name: String::new(),
            attributes: Attributes::uniform(20),
            skills: SkillBook::new(),
            enabled: EnabledSkills::new(),
            equipment: Equipment::empty(),
            max_health: 100,
            max_force: 0,
            enforce: 0,
            aggressive: false,
            loot: Vec::new(),
        }
    }
}

impl NpcTemplate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Snapshot of the instance identified by `key`, at full pools.
    pub fn to_character(&self, key: &OpponentKey) -> Character {
        let mut character = Character::new(key.entity_id(), self.name.clone(), key.room.clone())
            .with_attributes(self.attributes)
            .with_skills(self.skills.clone())
            .with_enabled(self.enabled.clone())
            .with_equipment(self.equipment.clone())
            .with_resources(Resources::full(self.max_health, self.max_force));
        character.set_enforce(self.enforce);
        character.state = CharacterState::Fighting;
        character
    }
}

/// Oracle providing NPC templates by id.
pub trait NpcOracle: Send + Sync {
    fn template(&self, id: &TemplateId) -> Option<NpcTemplate>;
}
