use std::collections::HashMap;

use wulin_core::{TechniqueDefinition, TechniqueId, TechniqueOracle};

#[derive(Debug, Default)]
pub struct TechniqueOracleImpl {
    techniques: HashMap<TechniqueId, TechniqueDefinition>,
}

impl TechniqueOracleImpl {
    pub fn new(techniques: HashMap<TechniqueId, TechniqueDefinition>) -> Self {
        Self { techniques }
    }

    pub fn add(&mut self, id: impl Into<TechniqueId>, def: TechniqueDefinition) {
        self.techniques.insert(id.into(), def);
    }

    pub fn len(&self) -> usize {
        self.techniques.len()
    }

    pub fn is_empty(&self) -> bool {
        self.techniques.is_empty()
    }
}

impl TechniqueOracle for TechniqueOracleImpl {
    fn technique(&self, id: &TechniqueId) -> Option<TechniqueDefinition> {
        self.techniques.get(id).cloned()
    }
}
