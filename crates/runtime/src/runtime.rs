//! High-level runtime orchestrator.
//!
//! The runtime owns the per-player slots, the combat store and the notifier,
//! and exposes a builder-based API for the command layer to drive combat.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock, broadcast};
use tracing::{debug, info, warn};

use wulin_content::ContentBundle;
use wulin_core::{Character, CombatConfig, CombatSession, EntityId};

use crate::api::{Result, RuntimeError};
use crate::clock::{Clock, SystemClock};
use crate::combat::PlayerSlot;
use crate::events::{Event, EventBus, Notifier, Topic};
use crate::oracle::OracleManager;
use crate::repository::{self, CombatStore, InMemoryStore};

/// How store writes are issued.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum WriteMode {
    /// Spawned on the executor; the tick does not wait for them.
    #[default]
    Detached,
    /// Awaited in order before the operation returns.
    Inline,
}

/// Runtime configuration (host knobs; balance lives in [`CombatConfig`]).
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub event_buffer_size: usize,
    pub write_mode: WriteMode,
    /// Start a recurring ticker when a player engages. Hosts that drive
    /// rounds themselves through `advance_tick` turn this off.
    pub auto_tick: bool,
    /// Game seed for the dice; random when unset.
    pub seed: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            event_buffer_size: 256,
            write_mode: WriteMode::Detached,
            auto_tick: true,
            seed: None,
        }
    }
}

impl RuntimeConfig {
    pub const ENV_EVENT_BUFFER: &'static str = "WULIN_EVENT_BUFFER";
    pub const ENV_WRITE_MODE: &'static str = "WULIN_WRITE_MODE";
    pub const ENV_AUTO_TICK: &'static str = "WULIN_AUTO_TICK";
    pub const ENV_SEED: &'static str = "WULIN_SEED";

    /// Reads `WULIN_*` variables over the defaults. Unparseable values are
    /// logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(size) = parse_var(&lookup, Self::ENV_EVENT_BUFFER) {
            config.event_buffer_size = size;
        }
        if let Some(mode) = parse_var(&lookup, Self::ENV_WRITE_MODE) {
            config.write_mode = mode;
        }
        if let Some(auto_tick) = parse_var(&lookup, Self::ENV_AUTO_TICK) {
            config.auto_tick = auto_tick;
        }
        if let Some(seed) = parse_var(&lookup, Self::ENV_SEED) {
            config.seed = Some(seed);
        }
        config
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparseable runtime setting");
            None
        }
    }
}

pub(crate) type SlotHandle = Arc<Mutex<PlayerSlot>>;

pub(crate) struct RuntimeInner {
    pub(crate) config: RuntimeConfig,
    pub(crate) combat: CombatConfig,
    pub(crate) oracles: OracleManager,
    pub(crate) store: Arc<dyn CombatStore>,
    pub(crate) notifier: Arc<dyn Notifier>,
    pub(crate) events: EventBus,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) seed: u64,
    pub(crate) players: RwLock<HashMap<EntityId, SlotHandle>>,
}

/// Combat runtime.
///
/// Cheap to clone; every clone drives the same players. Each player has one
/// slot holding the character, the engagement queue and the ticker, and
/// every operation on that player runs to completion under the slot lock.
#[derive(Clone)]
pub struct Runtime {
    pub(crate) inner: Arc<RuntimeInner>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    pub(crate) fn from_inner(inner: Arc<RuntimeInner>) -> Self {
        Self { inner }
    }

    /// Subscribe to one event topic.
    ///
    /// Only events published through the built-in [`EventBus`] are seen here;
    /// a custom notifier receives the rest.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.inner.events.subscribe(topic)
    }

    pub fn combat_config(&self) -> &CombatConfig {
        &self.inner.combat
    }

    pub fn oracles(&self) -> &OracleManager {
        &self.inner.oracles
    }

    pub fn store(&self) -> Arc<dyn CombatStore> {
        Arc::clone(&self.inner.store)
    }

    pub fn seed(&self) -> u64 {
        self.inner.seed
    }

    pub(crate) fn now(&self) -> i64 {
        self.inner.clock.now_ms()
    }

    pub(crate) fn notifier(&self) -> &dyn Notifier {
        self.inner.notifier.as_ref()
    }

    /// Puts `character` under runtime control, replacing any previous slot
    /// for the same id (its ticker is stopped).
    pub async fn register_player(&self, character: Character) {
        let id = character.id.clone();
        self.save_character(&character).await;
        let slot = Arc::new(Mutex::new(PlayerSlot::new(character)));
        let previous = self.inner.players.write().await.insert(id.clone(), slot);
        if let Some(previous) = previous {
            previous.lock().await.stop_ticker();
        }
        info!(target: "runtime::lifecycle", player = %id, "player registered");
    }

    /// Loads a saved character from the store and registers it.
    pub async fn restore_player(&self, id: &EntityId) -> Result<Character> {
        let character = self
            .inner
            .store
            .load_character(id)
            .await?
            .ok_or_else(|| RuntimeError::PlayerNotFound(id.clone()))?;
        self.register_player(character.clone()).await;
        Ok(character)
    }

    /// Stops the player's ticker and forgets the slot. Returns the final
    /// character.
    pub async fn unregister_player(&self, id: &EntityId) -> Result<Character> {
        let slot = self
            .inner
            .players
            .write()
            .await
            .remove(id)
            .ok_or_else(|| RuntimeError::PlayerNotFound(id.clone()))?;
        let mut slot = slot.lock().await;
        slot.stop_ticker();
        self.save_character(&slot.character).await;
        Ok(slot.character.clone())
    }

    /// Snapshot of the player's character.
    pub async fn player(&self, id: &EntityId) -> Result<Character> {
        let slot = self.slot(id).await?;
        let slot = slot.lock().await;
        Ok(slot.character.clone())
    }

    /// Snapshot of the player's engagement queue.
    pub async fn engagements(&self, id: &EntityId) -> Result<CombatSession> {
        let slot = self.slot(id).await?;
        let slot = slot.lock().await;
        Ok(slot.session.clone())
    }

    /// Whether a recurring ticker is driving the player's rounds.
    pub async fn is_ticking(&self, id: &EntityId) -> Result<bool> {
        let slot = self.slot(id).await?;
        let slot = slot.lock().await;
        Ok(slot.is_ticking())
    }

    /// Sets the overdrive level (clamped to 0..=10) and returns the value
    /// actually stored.
    pub async fn set_enforce(&self, id: &EntityId, level: u8) -> Result<u8> {
        let slot = self.slot(id).await?;
        let mut slot = slot.lock().await;
        let applied = slot.character.set_enforce(level);
        debug!(target: "runtime::lifecycle", player = %id, enforce = applied, "enforce set");
        self.save_character(&slot.character).await;
        Ok(applied)
    }

    /// Stops every ticker. Pending store writes are not awaited.
    pub async fn shutdown(&self) {
        let slots: Vec<SlotHandle> = self.inner.players.read().await.values().cloned().collect();
        for slot in slots {
            slot.lock().await.stop_ticker();
        }
        info!(target: "runtime::lifecycle", "runtime shut down");
    }

    pub(crate) async fn slot(&self, id: &EntityId) -> Result<SlotHandle> {
        self.inner
            .players
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| RuntimeError::PlayerNotFound(id.clone()))
    }

    pub(crate) async fn save_character(&self, character: &Character) {
        let character = character.clone();
        self.write("save_character", move |store| async move {
            store.save_character(&character).await
        })
        .await;
    }

    /// Issues one store write according to the configured [`WriteMode`].
    /// Failures are logged and never reach the caller.
    pub(crate) async fn write<F, Fut>(&self, what: &'static str, op: F)
    where
        F: FnOnce(Arc<dyn CombatStore>) -> Fut,
        Fut: Future<Output = repository::Result<()>> + Send + 'static,
    {
        let pending = op(Arc::clone(&self.inner.store));
        match self.inner.config.write_mode {
            WriteMode::Inline => {
                if let Err(error) = pending.await {
                    warn!(target: "runtime::store", what, %error, "store write failed");
                }
            }
            WriteMode::Detached => {
                tokio::spawn(async move {
                    if let Err(error) = pending.await {
                        warn!(target: "runtime::store", what, %error, "store write failed");
                    }
                });
            }
        }
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    combat: Option<CombatConfig>,
    oracles: Option<OracleManager>,
    store: Option<Arc<dyn CombatStore>>,
    notifier: Option<Arc<dyn Notifier>>,
    clock: Option<Arc<dyn Clock>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            combat: None,
            oracles: None,
            store: None,
            notifier: None,
            clock: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Oracles and balance constants from a loaded content bundle.
    pub fn content(mut self, bundle: &ContentBundle) -> Self {
        self.oracles = Some(OracleManager::from_bundle(bundle));
        self.combat = Some(bundle.config.clone());
        self
    }

    /// Set required oracle manager
    pub fn oracles(mut self, oracles: OracleManager) -> Self {
        self.oracles = Some(oracles);
        self
    }

    pub fn combat_config(mut self, combat: CombatConfig) -> Self {
        self.combat = Some(combat);
        self
    }

    /// Defaults to an [`InMemoryStore`].
    pub fn store(mut self, store: Arc<dyn CombatStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Replaces the built-in event bus as the narration sink.
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Defaults to [`SystemClock`].
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Build the runtime
    pub fn build(self) -> Result<Runtime> {
        let oracles = self.oracles.ok_or(RuntimeError::MissingOracles)?;
        let events = EventBus::with_capacity(self.config.event_buffer_size);
        let notifier = self
            .notifier
            .unwrap_or_else(|| Arc::new(events.clone()) as Arc<dyn Notifier>);
        let seed = self.config.seed.unwrap_or_else(rand::random);

        info!(
            target: "runtime::lifecycle",
            seed,
            write_mode = %self.config.write_mode,
            auto_tick = self.config.auto_tick,
            "runtime built"
        );

        Ok(Runtime {
            inner: Arc::new(RuntimeInner {
                combat: self.combat.unwrap_or_default(),
                oracles,
                store: self
                    .store
                    .unwrap_or_else(|| Arc::new(InMemoryStore::new()) as Arc<dyn CombatStore>),
                notifier,
                events,
                clock: self
                    .clock
                    .unwrap_or_else(|| Arc::new(SystemClock) as Arc<dyn Clock>),
                seed,
                players: RwLock::new(HashMap::new()),
                config: self.config,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_defaults() {
        let vars: HashMap<&str, &str> = [
            ("WULIN_EVENT_BUFFER", "32"),
            ("WULIN_WRITE_MODE", "Inline"),
            ("WULIN_AUTO_TICK", "false"),
            ("WULIN_SEED", "not-a-number"),
        ]
        .into_iter()
        .collect();
        let config = RuntimeConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.event_buffer_size, 32);
        assert_eq!(config.write_mode, WriteMode::Inline);
        assert!(!config.auto_tick);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn build_requires_oracles() {
        assert!(matches!(
            Runtime::builder().build(),
            Err(RuntimeError::MissingOracles)
        ));
    }

    #[tokio::test]
    async fn unknown_players_are_reported() {
        let runtime = Runtime::builder()
            .content(&ContentBundle::default())
            .build()
            .unwrap();
        let missing = EntityId::new("ghost");
        assert!(matches!(
            runtime.player(&missing).await,
            Err(RuntimeError::PlayerNotFound(id)) if id == missing
        ));
        assert!(matches!(
            runtime.restore_player(&missing).await,
            Err(RuntimeError::PlayerNotFound(_))
        ));
    }
}
