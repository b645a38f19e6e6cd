//! Data-driven content definitions and loaders.
//!
//! This crate reads the static tables the combat rules consult:
//! - Item catalog (RON)
//! - Skill catalog (RON)
//! - NPC templates with loot tables (RON)
//! - Technique definitions (RON)
//! - Room safety flags and opponent rosters (RON)
//! - Combat balance configuration (TOML)
//!
//! Content is consumed by runtime oracles and never appears in player state.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    ConfigLoader, ContentBundle, ContentFactory, ItemLoader, LoadResult, NpcLoader, RoomLoader,
    SkillLoader, TechniqueLoader,
};
