//! [`wulin_core::SkillOracle`] backed by an in-memory map.
use std::collections::HashMap;

use wulin_core::{SkillDefinition, SkillId, SkillOracle};

#[derive(Debug, Default)]
pub struct SkillOracleImpl {
    skills: HashMap<SkillId, SkillDefinition>,
}

impl SkillOracleImpl {
    pub fn new(skills: HashMap<SkillId, SkillDefinition>) -> Self {
        Self { skills }
    }

    pub fn add(&mut self, id: impl Into<SkillId>, def: SkillDefinition) {
        self.skills.insert(id.into(), def);
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

impl SkillOracle for SkillOracleImpl {
    fn skill(&self, id: &SkillId) -> Option<SkillDefinition> {
        self.skills.get(id).cloned()
    }
}
