//! Repository contracts for the mutable world state combat touches.
//!
//! Static content (items, NPCs, rooms) is served by oracles; everything here
//! changes during play and may live in an external store.

use async_trait::async_trait;
use wulin_core::{Character, EntityId, OpponentKey, RoomId};

use super::error::Result;
use super::types::{OpponentRecord, Pickup};

/// Durable player characters.
#[async_trait]
pub trait CharacterRepository: Send + Sync {
    async fn load_character(&self, id: &EntityId) -> Result<Option<Character>>;

    async fn save_character(&self, character: &Character) -> Result<()>;
}

/// Transient opponent records, shared between every player in the room.
#[async_trait]
pub trait OpponentRepository: Send + Sync {
    async fn opponent(&self, key: &OpponentKey) -> Result<Option<OpponentRecord>>;

    async fn save_opponent(&self, key: &OpponentKey, record: OpponentRecord) -> Result<()>;

    async fn clear_opponent(&self, key: &OpponentKey) -> Result<()>;

    /// Every record placed in `room`.
    async fn opponents_in(&self, room: &RoomId) -> Result<Vec<(OpponentKey, OpponentRecord)>>;
}

/// Respawn timers of defeated opponent instances.
#[async_trait]
pub trait RespawnRepository: Send + Sync {
    /// Epoch-ms at which `key` may be engaged again.
    async fn respawn_at(&self, key: &OpponentKey) -> Result<Option<i64>>;

    async fn schedule_respawn(&self, key: &OpponentKey, ready_at: i64) -> Result<()>;

    async fn clear_respawn(&self, key: &OpponentKey) -> Result<()>;
}

/// Items lying in rooms.
#[async_trait]
pub trait PickupRepository: Send + Sync {
    async fn drop_item(&self, pickup: Pickup) -> Result<()>;

    async fn pickups(&self, room: &RoomId) -> Result<Vec<Pickup>>;
}

/// Everything the combat runtime persists.
pub trait CombatStore:
    CharacterRepository + OpponentRepository + RespawnRepository + PickupRepository
{
}

impl<T> CombatStore for T where
    T: CharacterRepository + OpponentRepository + RespawnRepository + PickupRepository
{
}
