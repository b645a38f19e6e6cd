//! The unified character shape used for players and NPC snapshots.

use std::collections::BTreeMap;

use super::equipment::Equipment;
use super::ids::{EntityId, RoomId, TechniqueId};
use super::skills::{EnabledSkills, SkillBook};

/// Raw attribute points.
///
/// - **str**: melee power
/// - **con**: toughness, passive defense
/// - **per**: perception, accuracy and evasion
/// - **int**: learning (not used by combat formulas)
/// - **kar**: karma (not used by combat formulas)
/// - **cor**: courage (not used by combat formulas)
///
/// The same shape is used for flat bonuses granted by worn items, where the
/// default of all zeros means "no bonus".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Attributes {
    pub str: i32,
    pub con: i32,
    pub per: i32,
    pub int: i32,
    pub kar: i32,
    pub cor: i32,
}

impl Attributes {
    pub const fn new(str: i32, con: i32, per: i32, int: i32, kar: i32, cor: i32) -> Self {
        Self {
            str,
            con,
            per,
            int,
            kar,
            cor,
        }
    }

    /// Every attribute set to `value`.
    pub const fn uniform(value: i32) -> Self {
        Self::new(value, value, value, value, value, value)
    }

    /// Adds `bonus` field by field.
    pub fn add(&mut self, bonus: &Attributes) {
        self.str += bonus.str;
        self.con += bonus.con;
        self.per += bonus.per;
        self.int += bonus.int;
        self.kar += bonus.kar;
        self.cor += bonus.cor;
    }
}

/// Health and internal force pools.
///
/// Invariant: `health <= max_health` and `force <= max_force`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Resources {
    pub health: u32,
    pub max_health: u32,
    pub force: u32,
    pub max_force: u32,
}

impl Resources {
    /// Pools filled to their maxima.
    pub const fn full(max_health: u32, max_force: u32) -> Self {
        Self {
            health: max_health,
            max_health,
            force: max_force,
            max_force,
        }
    }

    /// Removes health (saturating at 0) and returns the remainder.
    pub fn take_damage(&mut self, damage: u32) -> u32 {
        self.health = self.health.saturating_sub(damage);
        self.health
    }

    /// Spends up to `amount` force; returns what was actually spent.
    pub fn spend_force(&mut self, amount: u32) -> u32 {
        let spent = amount.min(self.force);
        self.force -= spent;
        spent
    }

    pub fn restore_all(&mut self) {
        self.health = self.max_health;
        self.force = self.max_force;
    }

    pub fn set_health(&mut self, health: u32) {
        self.health = health.min(self.max_health);
    }
}

impl Default for Resources {
    fn default() -> Self {
        Self::full(100, 100)
    }
}

/// Combat progression counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatRecord {
    /// Accumulated potential, spent elsewhere to improve skills.
    pub potential: u64,
    pub kills: u32,
    /// Internal-power overdrive level, 0..=[`CombatRecord::MAX_ENFORCE`].
    pub enforce: u8,
}

impl CombatRecord {
    pub const MAX_ENFORCE: u8 = 10;
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CharacterState {
    #[default]
    Normal,
    Fighting,
    /// Health is held at 0; the entity can still be attacked.
    Unconscious,
    /// Waiting in limbo after death.
    Dead,
}

/// Player or NPC snapshot.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Character {
    pub id: EntityId,
    pub name: String,
    pub attributes: Attributes,
    pub skills: SkillBook,
    pub enabled: EnabledSkills,
    pub equipment: Equipment,
    pub resources: Resources,
    pub combat: CombatRecord,
    pub state: CharacterState,
    /// Technique id → epoch-ms at which it is ready again.
    pub cooldowns: BTreeMap<TechniqueId, i64>,
    /// Epoch-ms before which no technique may be used.
    pub gcd_until: i64,
    /// Epoch-ms until which the character is stunned or otherwise occupied.
    pub busy_until: i64,
    /// Channelling force (exercising/meditating); blocks techniques.
    pub exercising: bool,
    pub location: RoomId,
    /// Where the character returns to after a stay in limbo.
    pub respawn_point: RoomId,
    /// Epoch-ms of the pending automatic return from limbo.
    #[cfg_attr(feature = "serde", serde(default))]
    pub limbo_return_at: Option<i64>,
}

impl Character {
    pub fn new(id: impl Into<EntityId>, name: impl Into<String>, location: impl Into<RoomId>) -> Self {
        let location = location.into();
        Self {
            id: id.into(),
            name: name.into(),
            attributes: Attributes::uniform(20),
            skills: SkillBook::new(),
            enabled: EnabledSkills::new(),
            equipment: Equipment::empty(),
            resources: Resources::default(),
            combat: CombatRecord::default(),
            state: CharacterState::Normal,
            cooldowns: BTreeMap::new(),
            gcd_until: 0,
            busy_until: 0,
            exercising: false,
            respawn_point: location.clone(),
            location,
            limbo_return_at: None,
        }
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_skills(mut self, skills: SkillBook) -> Self {
        self.skills = skills;
        self
    }

    pub fn with_enabled(mut self, enabled: EnabledSkills) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_equipment(mut self, equipment: Equipment) -> Self {
        self.equipment = equipment;
        self
    }

    pub fn with_resources(mut self, resources: Resources) -> Self {
        self.resources = resources;
        self
    }

    pub fn with_respawn_point(mut self, room: impl Into<RoomId>) -> Self {
        self.respawn_point = room.into();
        self
    }

    pub fn is_unconscious(&self) -> bool {
        self.state == CharacterState::Unconscious
    }

    /// Sets the overdrive level, clamped to the allowed range.
    pub fn set_enforce(&mut self, level: u8) -> u8 {
        self.combat.enforce = level.min(CombatRecord::MAX_ENFORCE);
        self.combat.enforce
    }

    /// Epoch-ms at which `technique` is ready, if it has ever been used.
    pub fn cooldown(&self, technique: &TechniqueId) -> Option<i64> {
        self.cooldowns.get(technique).copied()
    }
}
