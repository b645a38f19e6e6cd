//! Minimal [`wulin_core::ItemOracle`] backed by an in-memory map.
use std::collections::HashMap;

use wulin_core::{ItemDefinition, ItemId, ItemOracle};

/// ItemOracle implementation with static item definitions
#[derive(Debug, Default)]
pub struct ItemOracleImpl {
    definitions: HashMap<ItemId, ItemDefinition>,
}

impl ItemOracleImpl {
    pub fn new(definitions: HashMap<ItemId, ItemDefinition>) -> Self {
        Self { definitions }
    }

    /// Add an item definition
    pub fn add_definition(&mut self, id: impl Into<ItemId>, def: ItemDefinition) {
        self.definitions.insert(id.into(), def);
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl ItemOracle for ItemOracleImpl {
    fn definition(&self, id: &ItemId) -> Option<ItemDefinition> {
        self.definitions.get(id).cloned()
    }
}
