//! Runtime orchestration for the martial combat rules.
//!
//! This crate wires the pure rules of `wulin-core` to a clock, a combat store,
//! a notifier and per-player tickers. Consumers embed [`Runtime`] and call its
//! operations (`engage`, `advance_tick`, `perform_technique`, `check_aggro`,
//! `disengage`, ...) from their command layer.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator, builder and host configuration
//! - [`api`] exposes the error types downstream clients interact with
//! - [`events`] provides topic-based event bus for narration and progress
//! - [`clock`] supplies epoch-ms time to every operation
//! - [`oracle`] and [`repository`] provide data adapters reused by other crates
//! - `combat` keeps the per-player slots and tickers internal to the crate
pub mod api;
pub mod clock;
pub mod events;
pub mod oracle;
pub mod repository;
pub mod runtime;

mod combat;

pub use api::{Result, RuntimeError};
pub use clock::{Clock, ManualClock, SystemClock};
pub use combat::Engagement;
pub use events::{
    DisengageReason, Event, EventBus, Narration, Notifier, ProgressEvent, RoomEvent, Topic,
};
pub use oracle::{
    ItemOracleImpl, NpcOracleImpl, OracleManager, RoomOracleImpl, SkillOracleImpl,
    TechniqueOracleImpl,
};
pub use repository::{
    CharacterRepository, CombatStore, InMemoryStore, OpponentRecord, OpponentRepository, Pickup,
    PickupRepository, RepositoryError, RespawnRepository,
};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig, WriteMode};
