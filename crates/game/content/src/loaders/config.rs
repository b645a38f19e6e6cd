//! Combat balance configuration loader.

use std::path::Path;

use wulin_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for [`CombatConfig`] from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file. Omitted keys keep their defaults.
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.tick_interval_ms == 0 {
            anyhow::bail!("tick_interval_ms must be positive");
        }
        if config.damage.floor_max == 0 {
            anyhow::bail!("damage.floor_max must be at least 1");
        }
        Ok(config)
    }
}
