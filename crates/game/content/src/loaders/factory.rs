//! Content factory for loading every table from a data directory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use wulin_core::{
    CombatConfig, ItemDefinition, ItemId, NpcTemplate, RoomDefinition, RoomId, SkillDefinition,
    SkillId, TechniqueDefinition, TechniqueId, TemplateId,
};

use crate::loaders::{
    ConfigLoader, ItemLoader, LoadResult, NpcLoader, RoomLoader, SkillLoader, TechniqueLoader,
};

/// Every table the combat rules need, keyed by id.
#[derive(Clone, Debug, Default)]
pub struct ContentBundle {
    pub config: CombatConfig,
    pub items: HashMap<ItemId, ItemDefinition>,
    pub skills: HashMap<SkillId, SkillDefinition>,
    pub npcs: HashMap<TemplateId, NpcTemplate>,
    pub techniques: HashMap<TechniqueId, TechniqueDefinition>,
    pub rooms: HashMap<RoomId, RoomDefinition>,
}

impl ContentBundle {
    /// Checks references between tables: rosters must name known templates,
    /// and NPC equipment and loot must name known items.
    pub fn validate(&self) -> LoadResult<()> {
        for (room_id, room) in &self.rooms {
            if let Some(entry) = room
                .roster
                .iter()
                .find(|entry| !self.npcs.contains_key(&entry.template))
            {
                anyhow::bail!("room '{}' lists unknown npc '{}'", room_id, entry.template);
            }
        }
        for (npc_id, npc) in &self.npcs {
            let equipped = npc.equipment.iter().map(|(_, item)| item);
            let dropped = npc.loot.iter().map(|drop| &drop.item);
            if let Some(item) = equipped.chain(dropped).find(|item| !self.items.contains_key(*item)) {
                anyhow::bail!("npc '{}' references unknown item '{}'", npc_id, item);
            }
        }
        Ok(())
    }
}

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── items.ron
/// ├── skills.ron
/// ├── npcs.ron
/// ├── techniques.ron
/// └── rooms.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load balance configuration from `config.toml`, falling back to the
    /// defaults when the file does not exist.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            return Ok(CombatConfig::default());
        }
        ConfigLoader::load(&path)
    }

    pub fn load_items(&self) -> LoadResult<Vec<(ItemId, ItemDefinition)>> {
        ItemLoader::load(&self.data_dir.join("items.ron"))
    }

    pub fn load_skills(&self) -> LoadResult<Vec<(SkillId, SkillDefinition)>> {
        SkillLoader::load(&self.data_dir.join("skills.ron"))
    }

    pub fn load_npcs(&self) -> LoadResult<Vec<(TemplateId, NpcTemplate)>> {
        NpcLoader::load(&self.data_dir.join("npcs.ron"))
    }

    pub fn load_techniques(&self) -> LoadResult<Vec<(TechniqueId, TechniqueDefinition)>> {
        TechniqueLoader::load(&self.data_dir.join("techniques.ron"))
    }

    pub fn load_rooms(&self) -> LoadResult<Vec<(RoomId, RoomDefinition)>> {
        RoomLoader::load(&self.data_dir.join("rooms.ron"))
    }

    /// Loads and cross-checks every table.
    pub fn load_bundle(&self) -> LoadResult<ContentBundle> {
        let bundle = ContentBundle {
            config: self.load_config()?,
            items: self.load_items()?.into_iter().collect(),
            skills: self.load_skills()?.into_iter().collect(),
            npcs: self.load_npcs()?.into_iter().collect(),
            techniques: self.load_techniques()?.into_iter().collect(),
            rooms: self.load_rooms()?.into_iter().collect(),
        };
        bundle.validate()?;
        Ok(bundle)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn shipped_data() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("data")
    }

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn shipped_content_loads() {
        let bundle = ContentFactory::new(shipped_data()).load_bundle().unwrap();
        assert!(bundle.rooms.values().any(|room| room.safe));
        assert!(bundle.npcs.values().any(|npc| npc.aggressive));
        assert!(!bundle.techniques.is_empty());
        assert_eq!(bundle.config.tick_interval_ms, 2_000);
    }

    #[test]
    fn unknown_roster_template_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        for table in ["items", "skills", "npcs", "techniques"] {
            fs::write(dir.path().join(format!("{table}.ron")), "[]").unwrap();
        }
        fs::write(
            dir.path().join("rooms.ron"),
            r#"[("pass", (name: "Mountain Pass", roster: [(template: "ghost", count: 1)]))]"#,
        )
        .unwrap();

        let err = ContentFactory::new(dir.path()).load_bundle().unwrap_err();
        assert!(err.to_string().contains("unknown npc 'ghost'"));
    }

    #[test]
    fn missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ContentFactory::new(dir.path()).load_config().unwrap();
        assert_eq!(config, CombatConfig::default());
    }
}
