//! Map-backed oracles for unit tests.

use std::collections::HashMap;

use crate::state::{ItemId, RoomId, SkillId, TechniqueId, TemplateId};

use super::{
    Env, ItemDefinition, ItemOracle, NpcOracle, NpcTemplate, RngOracle, RoomDefinition,
    RoomOracle, SkillDefinition, SkillOracle, TechniqueDefinition, TechniqueOracle,
};

/// Returns the same value for every seed.
#[derive(Clone, Copy, Debug)]
pub struct FixedRng(pub u32);

impl RngOracle for FixedRng {
    fn next_u32(&self, _seed: u64) -> u32 {
        self.0
    }
}

#[derive(Default)]
pub struct TestOracles {
    pub items: HashMap<ItemId, ItemDefinition>,
    pub skills: HashMap<SkillId, SkillDefinition>,
    pub npcs: HashMap<TemplateId, NpcTemplate>,
    pub techniques: HashMap<TechniqueId, TechniqueDefinition>,
    pub rooms: HashMap<RoomId, RoomDefinition>,
}

impl TestOracles {
    pub fn env<'a>(&'a self, rng: &'a dyn RngOracle) -> Env<'a> {
        Env::new(self, self, self, self, self, rng)
    }
}

impl ItemOracle for TestOracles {
    fn definition(&self, id: &ItemId) -> Option<ItemDefinition> {
        self.items.get(id).cloned()
    }
}

impl SkillOracle for TestOracles {
    fn skill(&self, id: &SkillId) -> Option<SkillDefinition> {
        self.skills.get(id).cloned()
    }
}

impl NpcOracle for TestOracles {
    fn template(&self, id: &TemplateId) -> Option<NpcTemplate> {
        self.npcs.get(id).cloned()
    }
}

impl TechniqueOracle for TestOracles {
    fn technique(&self, id: &TechniqueId) -> Option<TechniqueDefinition> {
        self.techniques.get(id).cloned()
    }
}

impl RoomOracle for TestOracles {
    fn room(&self, id: &RoomId) -> Option<RoomDefinition> {
        self.rooms.get(id).cloned()
    }
}
