//! In-memory [`CombatStore`](crate::repository::CombatStore) for tests and
//! local runs.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use wulin_core::{Character, EntityId, OpponentKey, RoomId};

use crate::repository::{
    CharacterRepository, OpponentRecord, OpponentRepository, Pickup, PickupRepository,
    RepositoryError, RespawnRepository, Result,
};

#[derive(Default)]
struct Tables {
    characters: HashMap<EntityId, Character>,
    opponents: HashMap<OpponentKey, OpponentRecord>,
    respawns: HashMap<OpponentKey, i64>,
    pickups: HashMap<RoomId, Vec<Pickup>>,
}

/// Implements every combat repository over plain maps.
///
/// [`set_available`](Self::set_available) makes every call fail with
/// [`RepositoryError::Unavailable`], standing in for a store outage.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
    offline: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_available(&self, available: bool) {
        self.offline.store(!available, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable("store offline".into()));
        }
        Ok(())
    }

    fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> Result<T> {
        self.check()?;
        let tables = self
            .tables
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(f(&tables))
    }

    fn write<T>(&self, f: impl FnOnce(&mut Tables) -> T) -> Result<T> {
        self.check()?;
        let mut tables = self
            .tables
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(f(&mut tables))
    }
}

#[async_trait]
impl CharacterRepository for InMemoryStore {
    async fn load_character(&self, id: &EntityId) -> Result<Option<Character>> {
        self.read(|tables| tables.characters.get(id).cloned())
    }

    async fn save_character(&self, character: &Character) -> Result<()> {
        self.write(|tables| {
            tables
                .characters
                .insert(character.id.clone(), character.clone());
        })
    }
}

#[async_trait]
impl OpponentRepository for InMemoryStore {
    async fn opponent(&self, key: &OpponentKey) -> Result<Option<OpponentRecord>> {
        self.read(|tables| tables.opponents.get(key).cloned())
    }

    async fn save_opponent(&self, key: &OpponentKey, record: OpponentRecord) -> Result<()> {
        self.write(|tables| {
            tables.opponents.insert(key.clone(), record);
        })
    }

    async fn clear_opponent(&self, key: &OpponentKey) -> Result<()> {
        self.write(|tables| {
            tables.opponents.remove(key);
        })
    }

    async fn opponents_in(&self, room: &RoomId) -> Result<Vec<(OpponentKey, OpponentRecord)>> {
        self.read(|tables| {
            let mut found: Vec<_> = tables
                .opponents
                .iter()
                .filter(|(_, record)| &record.room == room)
                .map(|(key, record)| (key.clone(), record.clone()))
                .collect();
            found.sort_by(|a, b| a.0.cmp(&b.0));
            found
        })
    }
}

#[async_trait]
impl RespawnRepository for InMemoryStore {
    async fn respawn_at(&self, key: &OpponentKey) -> Result<Option<i64>> {
        self.read(|tables| tables.respawns.get(key).copied())
    }

    async fn schedule_respawn(&self, key: &OpponentKey, ready_at: i64) -> Result<()> {
        self.write(|tables| {
            tables.respawns.insert(key.clone(), ready_at);
        })
    }

    async fn clear_respawn(&self, key: &OpponentKey) -> Result<()> {
        self.write(|tables| {
            tables.respawns.remove(key);
        })
    }
}

#[async_trait]
impl PickupRepository for InMemoryStore {
    async fn drop_item(&self, pickup: Pickup) -> Result<()> {
        self.write(|tables| {
            tables
                .pickups
                .entry(pickup.room.clone())
                .or_default()
                .push(pickup);
        })
    }

    async fn pickups(&self, room: &RoomId) -> Result<Vec<Pickup>> {
        self.read(|tables| tables.pickups.get(room).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wulin_core::TemplateId;

    fn key(room: &str, index: u32) -> OpponentKey {
        OpponentKey::new(RoomId::new(room), TemplateId::new("wolf"), index)
    }

    fn record(room: &str, health: u32) -> OpponentRecord {
        OpponentRecord {
            health,
            max_health: 80,
            room: RoomId::new(room),
            unconscious: false,
            touched_at: 0,
        }
    }

    #[tokio::test]
    async fn room_scan_only_returns_local_records() {
        let store = InMemoryStore::new();
        store.save_opponent(&key("forest", 1), record("forest", 40)).await.unwrap();
        store.save_opponent(&key("forest", 0), record("forest", 70)).await.unwrap();
        store.save_opponent(&key("pass", 0), record("pass", 10)).await.unwrap();

        let found = store.opponents_in(&RoomId::new("forest")).await.unwrap();
        let indices: Vec<u32> = found.iter().map(|(key, _)| key.index).collect();
        assert_eq!(indices, vec![0, 1]);

        store.clear_opponent(&key("forest", 0)).await.unwrap();
        assert!(store.opponent(&key("forest", 0)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn outage_fails_every_call_until_restored() {
        let store = InMemoryStore::new();
        store.schedule_respawn(&key("pass", 0), 500).await.unwrap();

        store.set_available(false);
        assert!(matches!(
            store.respawn_at(&key("pass", 0)).await,
            Err(RepositoryError::Unavailable(_))
        ));
        assert!(store.pickups(&RoomId::new("pass")).await.is_err());

        store.set_available(true);
        assert_eq!(store.respawn_at(&key("pass", 0)).await.unwrap(), Some(500));
    }

    #[test]
    fn stale_records_are_detected_by_age() {
        let record = record("forest", 40);
        assert!(!record.is_stale(300_000, 300_000));
        assert!(record.is_stale(300_001, 300_000));
    }
}
