//! Records kept by the combat store.

use serde::{Deserialize, Serialize};
use wulin_core::{ItemId, RoomId};

/// Shared, transient state of one opponent instance.
///
/// Every player fighting the same instance reads and writes the same record,
/// so they all see the same health. Records untouched for longer than the
/// liveness window are treated as stale and reset to template defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpponentRecord {
    pub health: u32,
    pub max_health: u32,
    pub room: RoomId,
    pub unconscious: bool,
    /// Epoch-ms of the last write.
    pub touched_at: i64,
}

impl OpponentRecord {
    pub fn is_stale(&self, now: i64, window_ms: i64) -> bool {
        now.saturating_sub(self.touched_at) > window_ms
    }

    /// Can be pulled into a fight.
    pub fn is_live(&self) -> bool {
        !self.unconscious && self.health > 0
    }
}

/// Item left on the floor by a defeated opponent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pickup {
    pub item: ItemId,
    pub room: RoomId,
    pub dropped_at: i64,
}
