//! Runtime wrappers around static game content oracles.
//!
//! These implementations expose `wulin-core` oracle traits and bundle them
//! into an [`OracleManager`] so the runtime can build [`wulin_core::Env`]
//! snapshots on demand. The data is immutable at runtime; dynamic state lives
//! in repositories or the per-player slots.
mod items;
mod npcs;
mod rooms;
mod skills;
mod techniques;

use std::sync::Arc;

use wulin_content::ContentBundle;
use wulin_core::{Env, PcgRng, RngOracle};

pub use items::ItemOracleImpl;
pub use npcs::NpcOracleImpl;
pub use rooms::RoomOracleImpl;
pub use skills::SkillOracleImpl;
pub use techniques::TechniqueOracleImpl;

/// Manages all oracle implementations and provides unified access
#[derive(Clone)]
pub struct OracleManager {
    pub(crate) items: Arc<ItemOracleImpl>,
    pub(crate) skills: Arc<SkillOracleImpl>,
    pub(crate) npcs: Arc<NpcOracleImpl>,
    pub(crate) techniques: Arc<TechniqueOracleImpl>,
    pub(crate) rooms: Arc<RoomOracleImpl>,
    pub(crate) rng: Arc<dyn RngOracle>,
}

impl OracleManager {
    /// Creates a new oracle manager
    pub fn new(
        items: Arc<ItemOracleImpl>,
        skills: Arc<SkillOracleImpl>,
        npcs: Arc<NpcOracleImpl>,
        techniques: Arc<TechniqueOracleImpl>,
        rooms: Arc<RoomOracleImpl>,
    ) -> Self {
        Self {
            items,
            skills,
            npcs,
            techniques,
            rooms,
            rng: Arc::new(PcgRng),
        }
    }

    /// Builds every oracle from a loaded content bundle.
    pub fn from_bundle(bundle: &ContentBundle) -> Self {
        Self::new(
            Arc::new(ItemOracleImpl::new(bundle.items.clone())),
            Arc::new(SkillOracleImpl::new(bundle.skills.clone())),
            Arc::new(NpcOracleImpl::new(bundle.npcs.clone())),
            Arc::new(TechniqueOracleImpl::new(bundle.techniques.clone())),
            Arc::new(RoomOracleImpl::new(bundle.rooms.clone())),
        )
    }

    /// Replaces the random source (deterministic hosts and tests).
    pub fn with_rng(mut self, rng: Arc<dyn RngOracle>) -> Self {
        self.rng = rng;
        self
    }

    /// Borrows the oracles as the environment the rules run against.
    pub fn as_env(&self) -> Env<'_> {
        Env::new(
            self.items.as_ref(),
            self.skills.as_ref(),
            self.npcs.as_ref(),
            self.techniques.as_ref(),
            self.rooms.as_ref(),
            self.rng.as_ref(),
        )
    }

    pub fn rooms(&self) -> &RoomOracleImpl {
        &self.rooms
    }

    pub fn npcs(&self) -> &NpcOracleImpl {
        &self.npcs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wulin_core::{NpcTemplate, RoomDefinition, RoomId, TemplateId};

    #[test]
    fn bundle_tables_reach_the_env() {
        let mut bundle = ContentBundle::default();
        bundle
            .npcs
            .insert(TemplateId::new("wolf"), NpcTemplate::new("Grey Wolf"));
        bundle.rooms.insert(
            RoomId::new("forest"),
            RoomDefinition::new("Pine Forest").with_roster("wolf", 2),
        );

        let oracles = OracleManager::from_bundle(&bundle);
        let env = oracles.as_env();

        let room = env.rooms().room(&RoomId::new("forest"));
        assert_eq!(room.map(|room| room.count_of(&TemplateId::new("wolf"))), Some(2));
        assert_eq!(
            env.npcs().template(&TemplateId::new("wolf")).map(|t| t.name),
            Some("Grey Wolf".to_string())
        );
        assert!(oracles.npcs().contains(&TemplateId::new("wolf")));
        assert!(env.items().definition(&"sword".into()).is_none());
    }
}
