//! Traits describing read-only world data.
//!
//! Oracles expose item, skill, NPC, technique and room definitions. The
//! [`Env`] aggregate bundles them together with the RNG so the rules can
//! reach everything they need without coupling to the content loader.
mod items;
mod npc;
mod rng;
mod rooms;
mod skills;
mod techniques;

#[cfg(test)]
pub(crate) mod testing;

pub use items::{ItemDefinition, ItemOracle};
pub use npc::{LootDrop, NpcOracle, NpcTemplate};
pub use rng::{PcgRng, RngOracle, compute_seed};
pub use rooms::{RoomDefinition, RoomOracle, RosterEntry};
pub use skills::{SkillDefinition, SkillOracle};
pub use techniques::{StatusEffect, TechniqueDefinition, TechniqueKind, TechniqueOracle};

use crate::state::{ItemId, SkillCategory, SkillId};

/// Aggregates read-only oracles required by the combat rules.
#[derive(Clone, Copy)]
pub struct Env<'a> {
    items: &'a dyn ItemOracle,
    skills: &'a dyn SkillOracle,
    npcs: &'a dyn NpcOracle,
    techniques: &'a dyn TechniqueOracle,
    rooms: &'a dyn RoomOracle,
    rng: &'a dyn RngOracle,
}

impl<'a> Env<'a> {
    pub fn new(
        items: &'a dyn ItemOracle,
        skills: &'a dyn SkillOracle,
        npcs: &'a dyn NpcOracle,
        techniques: &'a dyn TechniqueOracle,
        rooms: &'a dyn RoomOracle,
        rng: &'a dyn RngOracle,
    ) -> Self {
        Self {
            items,
            skills,
            npcs,
            techniques,
            rooms,
            rng,
        }
    }

    pub fn items(&self) -> &'a dyn ItemOracle {
        self.items
    }

    pub fn skills(&self) -> &'a dyn SkillOracle {
        self.skills
    }

    pub fn npcs(&self) -> &'a dyn NpcOracle {
        self.npcs
    }

    pub fn techniques(&self) -> &'a dyn TechniqueOracle {
        self.techniques
    }

    pub fn rooms(&self) -> &'a dyn RoomOracle {
        self.rooms
    }

    pub fn rng(&self) -> &'a dyn RngOracle {
        self.rng
    }

    /// Weapon category of an item; unknown items count as non-weapons.
    pub fn weapon_category(&self, item: Option<&ItemId>) -> SkillCategory {
        item.and_then(|id| self.items.definition(id))
            .and_then(|def| def.weapon)
            .unwrap_or(SkillCategory::Unarmed)
    }

    /// Skill definition, or neutral defaults for undefined (base) skills.
    pub fn skill_or_default(&self, id: &SkillId) -> SkillDefinition {
        self.skills.skill(id).unwrap_or_default()
    }
}

impl core::fmt::Debug for Env<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Env").finish_non_exhaustive()
    }
}
