//! Mutable character state owned by the runtime.
//!
//! Everything here is plain data. Derived numbers (attack power, effective
//! skill levels) are never stored on these types; see [`crate::stats`].
mod character;
mod equipment;
mod ids;
mod skills;

pub use character::{Attributes, Character, CharacterState, CombatRecord, Resources};
pub use equipment::{Equipment, Slot};
pub use ids::{EntityId, ItemId, OpponentKey, RoomId, SkillId, TechniqueId, TemplateId};
pub use skills::{EnabledSkills, SkillBook, SkillCategory};
