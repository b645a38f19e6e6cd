//! Repository layer for dynamic runtime data
//!
//! Repositories handle data that CHANGES during gameplay:
//! - Player characters (saved at the end of every tick)
//! - Transient opponent records shared by everyone in a room
//! - Respawn timers and dropped loot
//!
//! Static game content (items, NPCs, rooms) is handled by Oracles, not
//! Repositories.

mod error;
mod memory;
mod traits;
mod types;

pub use error::{RepositoryError, Result};
pub use memory::InMemoryStore;
pub use traits::{
    CharacterRepository, CombatStore, OpponentRepository, PickupRepository, RespawnRepository,
};
pub use types::{OpponentRecord, Pickup};
