//! Equipped items by slot.

use std::collections::BTreeMap;

use super::ids::ItemId;

/// Equipment slots. Only [`Slot::Weapon`] contributes attack modifiers; every
/// other slot is armor.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Slot {
    Weapon,
    Head,
    Body,
    Cloak,
    Hands,
    Waist,
    Legs,
    Feet,
    Neck,
    Finger,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Equipment(BTreeMap<Slot, ItemId>);

impl Equipment {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn equip(&mut self, slot: Slot, item: impl Into<ItemId>) -> Option<ItemId> {
        self.0.insert(slot, item.into())
    }

    /// Builder-style [`Equipment::equip`].
    pub fn with(mut self, slot: Slot, item: impl Into<ItemId>) -> Self {
        self.equip(slot, item);
        self
    }

    pub fn unequip(&mut self, slot: Slot) -> Option<ItemId> {
        self.0.remove(&slot)
    }

    pub fn weapon(&self) -> Option<&ItemId> {
        self.0.get(&Slot::Weapon)
    }

    /// Occupied non-weapon slots.
    pub fn armor(&self) -> impl Iterator<Item = (Slot, &ItemId)> {
        self.0
            .iter()
            .filter(|(slot, _)| **slot != Slot::Weapon)
            .map(|(slot, item)| (*slot, item))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Slot, &ItemId)> {
        self.0.iter().map(|(slot, item)| (*slot, item))
    }
}
