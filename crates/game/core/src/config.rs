use crate::state::RoomId;

/// Balance constants and cadences for the combat rules.
///
/// Every field has a default, so a partial TOML table only needs to name
/// what it overrides.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Interval between two rounds of one player's engagement.
    pub tick_interval_ms: u64,
    /// Shared minimum interval between two technique activations.
    pub global_cooldown_ms: i64,
    /// Delay after a lethal defeat before the instance can be engaged again.
    pub respawn_delay_ms: i64,
    /// Delay before a dead player is returned from limbo.
    pub limbo_return_delay_ms: i64,
    /// Opponent records untouched for longer than this are reset to full.
    pub record_stale_ms: i64,
    /// Where dead players wait.
    pub limbo_room: RoomId,
    /// Potential gained for winning a sparring match.
    pub sparring_potential: u64,
    pub enforce: EnforceRules,
    pub damage: DamageRules,
    pub reward: RewardRules,
    pub coefficients: StatCoefficients,
}

impl CombatConfig {
    pub const DEFAULT_TICK_INTERVAL_MS: u64 = 2_000;
    pub const DEFAULT_GLOBAL_COOLDOWN_MS: i64 = 2_000;
    pub const DEFAULT_RESPAWN_DELAY_MS: i64 = 3 * 60 * 1_000;
    pub const DEFAULT_LIMBO_RETURN_DELAY_MS: i64 = 3 * 60 * 1_000;
    pub const DEFAULT_RECORD_STALE_MS: i64 = 5 * 60 * 1_000;
    pub const DEFAULT_LIMBO_ROOM: &'static str = "limbo";
    pub const DEFAULT_SPARRING_POTENTIAL: u64 = 5;

    pub fn new() -> Self {
        Self {
            tick_interval_ms: Self::DEFAULT_TICK_INTERVAL_MS,
            global_cooldown_ms: Self::DEFAULT_GLOBAL_COOLDOWN_MS,
            respawn_delay_ms: Self::DEFAULT_RESPAWN_DELAY_MS,
            limbo_return_delay_ms: Self::DEFAULT_LIMBO_RETURN_DELAY_MS,
            record_stale_ms: Self::DEFAULT_RECORD_STALE_MS,
            limbo_room: RoomId::new(Self::DEFAULT_LIMBO_ROOM),
            sparring_potential: Self::DEFAULT_SPARRING_POTENTIAL,
            enforce: EnforceRules::default(),
            damage: DamageRules::default(),
            reward: RewardRules::default(),
            coefficients: StatCoefficients::default(),
        }
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Internal-power overdrive tuning.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EnforceRules {
    /// Force consumed per enforce level on every ordinary strike.
    pub cost_per_level: u32,
    /// Bonus factor when fighting unarmed.
    pub unarmed_factor: f64,
    /// Bonus factor when wielding a weapon.
    pub weapon_factor: f64,
    /// Technique multiplier gained per enforce level.
    pub technique_scale_per_level: f64,
}

impl Default for EnforceRules {
    fn default() -> Self {
        Self {
            cost_per_level: 5,
            unarmed_factor: 1.0,
            weapon_factor: 0.75,
            technique_scale_per_level: 0.15,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DamageRules {
    /// Symmetric jitter around the raw value, in percent.
    pub jitter_pct: u32,
    /// A non-positive raw value still deals `1..=floor_max`.
    pub floor_max: u32,
}

impl Default for DamageRules {
    fn default() -> Self {
        Self {
            jitter_pct: 10,
            floor_max: 5,
        }
    }
}

/// Potential reward for lethal defeats.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RewardRules {
    pub base: i64,
    pub per_level: i64,
    pub minimum: i64,
    /// Below this difficulty ratio the reward is zeroed.
    pub trivial_ratio: f64,
    /// Below this difficulty ratio the reward is halved.
    pub easy_ratio: f64,
}

impl Default for RewardRules {
    fn default() -> Self {
        Self {
            base: 100,
            per_level: 10,
            minimum: 10,
            trivial_ratio: 0.5,
            easy_ratio: 0.8,
        }
    }
}

/// The single coefficient table behind [`crate::stats::derive_stats`].
///
/// | term | formula |
/// |---|---|
/// | attack power | `str×ap_str + attack×rating×ap_skill + force×ap_force + weapon.damage` |
/// | defense power | `con×dp_con + force×dp_force + dodge×dodge_rating×dp_dodge + armor` |
/// | hit rating | `per×hit_per + attack×rating×hit_skill + weapon.hit` |
/// | dodge rating | `per×dodge_per + dodge×dodge_rating×dodge_skill + attack×parry` |
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatCoefficients {
    pub ap_str: f64,
    pub ap_skill: f64,
    pub ap_force: f64,
    pub dp_con: f64,
    pub dp_force: f64,
    pub dp_dodge: f64,
    pub hit_per: f64,
    pub hit_skill: f64,
    pub dodge_per: f64,
    pub dodge_skill: f64,
    pub parry: f64,
}

impl Default for StatCoefficients {
    fn default() -> Self {
        Self {
            ap_str: 2.0,
            ap_skill: 1.5,
            ap_force: 0.5,
            dp_con: 2.0,
            dp_force: 0.5,
            dp_dodge: 1.0,
            hit_per: 2.0,
            hit_skill: 1.0,
            dodge_per: 1.0,
            dodge_skill: 1.0,
            parry: 0.2,
        }
    }
}
