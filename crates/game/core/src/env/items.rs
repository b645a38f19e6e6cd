use crate::state::{Attributes, ItemId, SkillCategory};

/// Static item definition as far as combat is concerned.
///
/// Weapons set `weapon` to their category and contribute `damage`/`hit`.
/// Worn items contribute `defense` and flat attribute `props`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ItemDefinition {
    pub name: String,
    pub weapon: Option<SkillCategory>,
    pub damage: i32,
    pub hit: i32,
    pub defense: i32,
    pub props: Attributes,
}

impl ItemDefinition {
    pub fn weapon(name: impl Into<String>, category: SkillCategory, damage: i32, hit: i32) -> Self {
        Self {
            name: name.into(),
            weapon: Some(category),
            damage,
            hit,
            ..Self::default()
        }
    }

    pub fn armor(name: impl Into<String>, defense: i32) -> Self {
        Self {
            name: name.into(),
            defense,
            ..Self::default()
        }
    }

    pub fn with_props(mut self, props: Attributes) -> Self {
        self.props = props;
        self
    }
}

/// Oracle providing item definitions.
pub trait ItemOracle: Send + Sync {
    fn definition(&self, id: &ItemId) -> Option<ItemDefinition>;
}
