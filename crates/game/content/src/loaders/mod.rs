//! Content loaders for reading game data from files.
//!
//! Definition tables are RON lists of `(id, definition)` pairs; the balance
//! configuration is a TOML document.

pub mod catalog;
pub mod config;
pub mod factory;

pub use catalog::{ItemLoader, NpcLoader, RoomLoader, SkillLoader, TechniqueLoader};
pub use config::ConfigLoader;
pub use factory::{ContentBundle, ContentFactory};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
