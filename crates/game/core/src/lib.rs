//! Deterministic combat and progression rules for the martial world.
//!
//! `wulin-core` defines the canonical rules (stat derivation, skill
//! proficiency, strike resolution, the per-tick round, technique gating,
//! rewards and death penalties) as pure functions over owned snapshots.
//! Nothing in this crate performs I/O, reads a clock, or owns a timer: the
//! runtime feeds in `now`, a seeded [`Dice`], and the read-only [`Env`]
//! oracles, then applies the returned reports to its stores and notifier.
pub mod combat;
pub mod config;
pub mod engagement;
pub mod env;
pub mod lifecycle;
pub mod perform;
pub mod reward;
pub mod round;
pub mod state;
pub mod stats;

pub use combat::{AttackOutcome, AttackResult, Dice, HealthBand, StrikeBonus};
pub use config::{CombatConfig, DamageRules, EnforceRules, RewardRules, StatCoefficients};
pub use engagement::{CombatSession, EngagementEntry, Intent, OpponentRef};
pub use env::{
    Env, ItemDefinition, ItemOracle, LootDrop, NpcOracle, NpcTemplate, PcgRng, RngOracle,
    RoomDefinition, RoomOracle, RosterEntry, SkillDefinition, SkillOracle, StatusEffect,
    TechniqueDefinition, TechniqueKind, TechniqueOracle, compute_seed,
};
pub use lifecycle::DeathReport;
pub use perform::{
    PerformRejection, PerformReport, check_technique, commit_technique, execute_technique,
    select_target,
};
pub use reward::{Reward, potential_reward, resolve_defeat};
pub use round::{RoundContext, RoundEnd, RoundEvent, RoundReport, resolve_round};
pub use state::{
    Attributes, Character, CharacterState, CombatRecord, EnabledSkills, EntityId, Equipment,
    ItemId, OpponentKey, Resources, RoomId, SkillBook, SkillCategory, SkillId, Slot, TechniqueId,
    TemplateId,
};
pub use stats::{
    CombatStats, combat_power, derive_stats, difficulty_ratio, effective_level, entity_level,
};
