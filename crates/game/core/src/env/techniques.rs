use crate::state::{SkillCategory, SkillId, TechniqueId};

/// Timed status a technique can leave on its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StatusEffect {
    /// The target loses its attacks until the effect expires.
    Restrained,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TechniqueKind {
    Single,
    Aoe,
    MultiHit { hits: u32 },
    BuffDebuff { effect: StatusEffect, duration_ms: i64 },
}

/// Static technique ("perform") definition.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TechniqueDefinition {
    pub name: String,
    /// Advanced skill that must be enabled to use this technique.
    pub required_skill: SkillId,
    /// `unarmed` means no weapon may be wielded.
    pub required_weapon: SkillCategory,
    pub force_cost: u32,
    pub cooldown_ms: i64,
    pub damage_scale: f64,
    pub kind: TechniqueKind,
}

impl TechniqueDefinition {
    pub fn new(
        name: impl Into<String>,
        required_skill: impl Into<SkillId>,
        required_weapon: SkillCategory,
        kind: TechniqueKind,
    ) -> Self {
        Self {
            name: name.into(),
            required_skill: required_skill.into(),
            required_weapon,
            force_cost: 0,
            cooldown_ms: 0,
            damage_scale: 1.0,
            kind,
        }
    }

    pub fn with_cost(mut self, force_cost: u32, cooldown_ms: i64) -> Self {
        self.force_cost = force_cost;
        self.cooldown_ms = cooldown_ms;
        self
    }

    pub fn with_scale(mut self, damage_scale: f64) -> Self {
        self.damage_scale = damage_scale;
        self
    }

    /// Number of strikes delivered to a single target.
    pub fn strikes(&self) -> u32 {
        match self.kind {
            TechniqueKind::MultiHit { hits } => hits.max(1),
            _ => 1,
        }
    }
}

/// Oracle providing technique definitions.
pub trait TechniqueOracle: Send + Sync {
    fn technique(&self, id: &TechniqueId) -> Option<TechniqueDefinition>;
}
