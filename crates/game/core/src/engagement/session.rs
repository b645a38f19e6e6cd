use std::collections::VecDeque;

use crate::state::OpponentKey;

use super::entry::EngagementEntry;

/// Ordered queue of engagements. Opponent counts are small, so membership is
/// a linear scan.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatSession {
    entries: VecDeque<EngagementEntry>,
}

impl CombatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Current target.
    pub fn head(&self) -> Option<&EngagementEntry> {
        self.entries.front()
    }

    pub fn head_mut(&mut self) -> Option<&mut EngagementEntry> {
        self.entries.front_mut()
    }

    pub fn contains(&self, key: &OpponentKey) -> bool {
        self.position(key).is_some()
    }

    pub fn get(&self, key: &OpponentKey) -> Option<&EngagementEntry> {
        self.entries.iter().find(|entry| &entry.key == key)
    }

    pub fn get_mut(&mut self, key: &OpponentKey) -> Option<&mut EngagementEntry> {
        self.entries.iter_mut().find(|entry| &entry.key == key)
    }

    /// Moves a tracked opponent to the head. Returns false when it is not
    /// tracked.
    pub fn promote(&mut self, key: &OpponentKey) -> bool {
        let Some(position) = self.position(key) else {
            return false;
        };
        if let Some(entry) = self.entries.remove(position) {
            self.entries.push_front(entry);
        }
        true
    }

    /// Appends `entry` unless its opponent is already tracked. Returns whether
    /// it was added.
    pub fn push(&mut self, entry: EngagementEntry) -> bool {
        if self.contains(&entry.key) {
            return false;
        }
        self.entries.push_back(entry);
        true
    }

    pub fn remove(&mut self, key: &OpponentKey) -> Option<EngagementEntry> {
        let position = self.position(key)?;
        self.entries.remove(position)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &EngagementEntry> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut EngagementEntry> {
        self.entries.iter_mut()
    }

    /// Keys in queue order.
    pub fn keys(&self) -> Vec<OpponentKey> {
        self.entries.iter().map(|entry| entry.key.clone()).collect()
    }

    fn position(&self, key: &OpponentKey) -> Option<usize> {
        self.entries.iter().position(|entry| &entry.key == key)
    }
}
