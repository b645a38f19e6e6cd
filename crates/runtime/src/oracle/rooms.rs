//! Room oracle with roster lookups used by aggro checks.

use std::collections::HashMap;

use wulin_core::{RoomDefinition, RoomId, RoomOracle};

#[derive(Debug, Default)]
pub struct RoomOracleImpl {
    rooms: HashMap<RoomId, RoomDefinition>,
}

impl RoomOracleImpl {
    pub fn new(rooms: HashMap<RoomId, RoomDefinition>) -> Self {
        Self { rooms }
    }

    pub fn add(&mut self, id: impl Into<RoomId>, room: RoomDefinition) {
        self.rooms.insert(id.into(), room);
    }

    /// Borrowing lookup; the trait method clones.
    pub fn get(&self, id: &RoomId) -> Option<&RoomDefinition> {
        self.rooms.get(id)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

impl RoomOracle for RoomOracleImpl {
    fn room(&self, id: &RoomId) -> Option<RoomDefinition> {
        self.rooms.get(id).cloned()
    }
}
