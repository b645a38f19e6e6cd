use crate::env::NpcTemplate;
use crate::state::{Character, OpponentKey, RoomId, TemplateId};

/// Whether an engagement can kill.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Intent {
    #[default]
    Lethal,
    /// Knockout only: halved damage, no loot, no respawn.
    Sparring,
}

impl Intent {
    pub const fn from_lethal(lethal: bool) -> Self {
        if lethal { Self::Lethal } else { Self::Sparring }
    }

    pub const fn is_lethal(self) -> bool {
        matches!(self, Self::Lethal)
    }
}

/// How a command names an opponent: a template, optionally with the index of
/// the instance. Without an index the first live instance is meant.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OpponentRef {
    pub template: TemplateId,
    pub index: Option<u32>,
}

impl OpponentRef {
    pub fn any(template: impl Into<TemplateId>) -> Self {
        Self {
            template: template.into(),
            index: None,
        }
    }

    pub fn nth(template: impl Into<TemplateId>, index: u32) -> Self {
        Self {
            template: template.into(),
            index: Some(index),
        }
    }
}

/// One opponent the player is fighting.
///
/// `current_health` is the session's cached copy of the shared record in the
/// store; the snapshot carries everything needed to derive its stats.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngagementEntry {
    pub key: OpponentKey,
    pub display_name: String,
    pub current_health: u32,
    pub max_health: u32,
    pub unconscious: bool,
    pub intent: Intent,
    /// Opponent combat power over the player's, fixed at engagement time.
    pub difficulty_ratio: f64,
    /// Epoch-ms until which the opponent cannot attack.
    pub restrained_until: i64,
    pub snapshot: Character,
}

impl EngagementEntry {
    pub fn new(
        key: OpponentKey,
        template: &NpcTemplate,
        current_health: u32,
        intent: Intent,
        difficulty_ratio: f64,
    ) -> Self {
        let mut snapshot = template.to_character(&key);
        snapshot.resources.set_health(current_health);
        Self {
            display_name: template.name.clone(),
            current_health: snapshot.resources.health,
            max_health: snapshot.resources.max_health,
            unconscious: false,
            intent,
            difficulty_ratio,
            restrained_until: 0,
            snapshot,
            key,
        }
    }

    pub fn room(&self) -> &RoomId {
        &self.key.room
    }

    /// Still able to fight and be fought.
    pub fn is_live(&self) -> bool {
        !self.unconscious && self.current_health > 0
    }

    pub fn is_restrained(&self, now: i64) -> bool {
        self.restrained_until > now
    }

    pub fn restrain_until(&mut self, until: i64) {
        self.restrained_until = self.restrained_until.max(until);
    }

    /// Applies damage and returns the remaining health. Reaching 0 marks the
    /// entry unconscious.
    pub fn take_damage(&mut self, damage: u32) -> u32 {
        self.current_health = self.current_health.saturating_sub(damage);
        self.snapshot.resources.set_health(self.current_health);
        if self.current_health == 0 {
            self.unconscious = true;
        }
        self.current_health
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{RoomId, TemplateId};

    fn bandit_key() -> OpponentKey {
        OpponentKey::new(RoomId::new("pass"), TemplateId::new("bandit"), 1)
    }

    #[test]
    fn entry_clamps_health_to_template_max() {
        let template = NpcTemplate::new("Bandit");
        let entry = EngagementEntry::new(bandit_key(), &template, 500, Intent::Lethal, 1.0);
        assert_eq!(entry.current_health, 100);
        assert_eq!(entry.max_health, 100);
        assert_eq!(entry.snapshot.id.as_str(), "pass/bandit#1");
    }

    #[test]
    fn lethal_damage_marks_unconscious() {
        let template = NpcTemplate::new("Bandit");
        let mut entry = EngagementEntry::new(bandit_key(), &template, 30, Intent::Lethal, 1.0);
        assert_eq!(entry.take_damage(10), 20);
        assert!(entry.is_live());
        assert_eq!(entry.take_damage(25), 0);
        assert!(!entry.is_live());
        assert_eq!(entry.snapshot.resources.health, 0);
    }

    #[test]
    fn restraint_only_extends() {
        let template = NpcTemplate::new("Bandit");
        let mut entry = EngagementEntry::new(bandit_key(), &template, 30, Intent::Lethal, 1.0);
        entry.restrain_until(5_000);
        entry.restrain_until(1_000);
        assert!(entry.is_restrained(4_999));
        assert!(!entry.is_restrained(5_000));
    }
}
