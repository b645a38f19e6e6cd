//! Definition catalog loaders.
//!
//! Every catalog is a RON list of `(id, definition)` pairs:
//!
//! ```ron
//! [
//!     ("iron-sword", (name: "Iron Sword", weapon: Some(sword), damage: 12, hit: 4)),
//! ]
//! ```

use std::collections::HashSet;
use std::fmt::Display;
use std::hash::Hash;
use std::path::Path;

use serde::de::DeserializeOwned;
use wulin_core::{
    ItemDefinition, ItemId, NpcTemplate, RoomDefinition, RoomId, SkillDefinition, SkillId,
    TechniqueDefinition, TechniqueId, TemplateId,
};

use crate::loaders::{LoadResult, read_file};

/// Parses a catalog and rejects duplicate ids.
fn parse_catalog<K, V>(content: &str, what: &str) -> LoadResult<Vec<(K, V)>>
where
    K: DeserializeOwned + Eq + Hash + Clone + Display,
    V: DeserializeOwned,
{
    let entries: Vec<(K, V)> = ron::from_str(content)
        .map_err(|e| anyhow::anyhow!("Failed to parse {} catalog RON: {}", what, e))?;

    let mut seen = HashSet::new();
    for (id, _) in &entries {
        if !seen.insert(id.clone()) {
            anyhow::bail!("duplicate {} id '{}'", what, id);
        }
    }
    Ok(entries)
}

/// Loader for the item catalog.
pub struct ItemLoader;

impl ItemLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<(ItemId, ItemDefinition)>> {
        parse_catalog(&read_file(path)?, "item")
    }
}

/// Loader for the skill catalog.
pub struct SkillLoader;

impl SkillLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<(SkillId, SkillDefinition)>> {
        parse_catalog(&read_file(path)?, "skill")
    }
}

/// Loader for NPC templates.
pub struct NpcLoader;

impl NpcLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<(TemplateId, NpcTemplate)>> {
        let templates: Vec<(TemplateId, NpcTemplate)> = parse_catalog(&read_file(path)?, "npc")?;
        for (id, template) in &templates {
            if template.max_health == 0 {
                anyhow::bail!("npc '{}' has no health", id);
            }
            if let Some(drop) = template
                .loot
                .iter()
                .find(|drop| !(0.0..=1.0).contains(&drop.rate))
            {
                anyhow::bail!(
                    "npc '{}' drops '{}' at rate {} outside [0, 1]",
                    id,
                    drop.item,
                    drop.rate
                );
            }
        }
        Ok(templates)
    }
}

/// Loader for technique definitions.
pub struct TechniqueLoader;

impl TechniqueLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<(TechniqueId, TechniqueDefinition)>> {
        parse_catalog(&read_file(path)?, "technique")
    }
}

/// Loader for room definitions.
pub struct RoomLoader;

impl RoomLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<(RoomId, RoomDefinition)>> {
        parse_catalog(&read_file(path)?, "room")
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use wulin_core::{SkillCategory, TechniqueKind};

    use super::*;

    fn write(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_items_with_optional_fields() {
        let file = write(
            r#"[
                ("iron-sword", (name: "Iron Sword", weapon: Some(sword), damage: 12, hit: 4)),
                ("quilted-robe", (name: "Quilted Robe", defense: 6, props: (con: 2))),
            ]"#,
        );

        let items = ItemLoader::load(file.path()).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].1.weapon, Some(SkillCategory::Sword));
        assert_eq!(items[1].1.props.con, 2);
        assert_eq!(items[1].1.weapon, None);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let file = write(
            r#"[
                ("rope", (name: "Rope")),
                ("rope", (name: "Another Rope")),
            ]"#,
        );

        let err = ItemLoader::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("duplicate item id 'rope'"));
    }

    #[test]
    fn loads_technique_kinds() {
        let file = write(
            r#"[
                ("thunder", (
                    name: "Thunder Palm",
                    required_skill: "iron-palm",
                    required_weapon: unarmed,
                    force_cost: 40,
                    cooldown_ms: 8000,
                    damage_scale: 1.5,
                    kind: multi_hit(hits: 3),
                )),
            ]"#,
        );

        let techniques = TechniqueLoader::load(file.path()).unwrap();
        assert_eq!(techniques[0].1.kind, TechniqueKind::MultiHit { hits: 3 });
        assert_eq!(techniques[0].1.required_weapon, SkillCategory::Unarmed);
    }

    #[test]
    fn loot_rates_must_be_probabilities() {
        let file = write(
            r#"[
                ("bandit", (name: "Bandit", loot: [(item: "copper", rate: 1.5)])),
            ]"#,
        );

        let err = NpcLoader::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("outside [0, 1]"));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = RoomLoader::load(Path::new("/nonexistent/rooms.ron")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/rooms.ron"));
    }
}
