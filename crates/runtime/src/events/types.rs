//! Event types for different topics.

use serde::{Deserialize, Serialize};
use wulin_core::{EntityId, Intent, ItemId, OpponentKey, RoomId, RoundEvent, TechniqueId};

/// Why an engagement ended without a defeat on either side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisengageReason {
    /// The player asked to stop.
    Requested,
    /// The player walked away from the opponents.
    LeftRoom,
    /// Every opponent is gone.
    SessionEmpty,
}

/// Something the occupants of a room should be told about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Narration {
    EngagementStarted {
        opponent: OpponentKey,
        name: String,
        intent: Intent,
    },
    Retargeted {
        head: OpponentKey,
    },
    TechniqueUsed {
        technique: TechniqueId,
        name: String,
    },
    /// A strike, wound, defeat or collapse reported by the rules.
    Combat(RoundEvent),
    LootDropped {
        item: ItemId,
    },
    Disengaged {
        reason: DisengageReason,
    },
    /// An unconscious player came to with 1 health.
    Woke,
    Arrived,
}

/// Narration scoped to the room it happened in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomEvent {
    pub room: RoomId,
    /// Character the narration is about (the actor, not the audience).
    pub origin: EntityId,
    pub narration: Narration,
}

/// Changes to a player's long-term progression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgressEvent {
    PotentialGained {
        player: EntityId,
        amount: u64,
        total: u64,
    },
    KillRecorded {
        player: EntityId,
        kills: u32,
    },
    DeathPenalty {
        player: EntityId,
        skills_reduced: usize,
        return_at: i64,
    },
    ReturnedFromLimbo {
        player: EntityId,
        room: RoomId,
    },
}
