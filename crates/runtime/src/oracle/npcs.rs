//! NPC oracle implementing [`wulin_core::NpcOracle`].

use std::collections::HashMap;

use wulin_core::{NpcOracle, NpcTemplate, TemplateId};

/// Oracle providing NPC templates.
#[derive(Debug, Default)]
pub struct NpcOracleImpl {
    templates: HashMap<TemplateId, NpcTemplate>,
}

impl NpcOracleImpl {
    pub fn new(templates: HashMap<TemplateId, NpcTemplate>) -> Self {
        Self { templates }
    }

    /// Add an NPC template to the oracle.
    ///
    /// # Arguments
    ///
    /// * `id` - Template ID used by room rosters (e.g., "bandit")
    /// * `template` - Template every instance is built from
    pub fn add(&mut self, id: impl Into<TemplateId>, template: NpcTemplate) {
        self.templates.insert(id.into(), template);
    }

    /// Borrowing lookup; the trait method clones.
    pub fn get(&self, id: &TemplateId) -> Option<&NpcTemplate> {
        self.templates.get(id)
    }

    /// Check if a template exists.
    pub fn contains(&self, id: &TemplateId) -> bool {
        self.templates.contains_key(id)
    }

    /// Full health of every instance of `id`.
    pub fn max_health(&self, id: &TemplateId) -> Option<u32> {
        self.templates.get(id).map(|template| template.max_health)
    }

    /// Get all template IDs.
    pub fn template_ids(&self) -> impl Iterator<Item = &TemplateId> {
        self.templates.keys()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl NpcOracle for NpcOracleImpl {
    fn template(&self, id: &TemplateId) -> Option<NpcTemplate> {
        self.templates.get(id).cloned()
    }
}
