//! Attack result types and attack resolution.

use crate::config::DamageRules;
use crate::engagement::Intent;
use crate::stats::CombatStats;

use super::damage::{StrikeBonus, roll_damage};
use super::dice::Dice;
use super::hit::roll_hit;

/// Outcome of an attack attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackOutcome {
    Miss,
    Hit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackResult {
    pub outcome: AttackOutcome,
    /// Damage dealt (None if miss).
    pub damage: Option<u32>,
}

impl AttackResult {
    pub const MISS: Self = Self {
        outcome: AttackOutcome::Miss,
        damage: None,
    };

    pub fn hit(damage: u32) -> Self {
        Self {
            outcome: AttackOutcome::Hit,
            damage: Some(damage),
        }
    }

    pub fn is_hit(&self) -> bool {
        self.outcome == AttackOutcome::Hit
    }

    pub fn damage(&self) -> u32 {
        self.damage.unwrap_or(0)
    }
}

/// Hit check followed by damage calculation.
pub fn resolve_attack(
    attacker: &CombatStats,
    defender: &CombatStats,
    bonus: &StrikeBonus,
    intent: Intent,
    rules: &DamageRules,
    dice: &mut Dice<'_>,
) -> AttackResult {
    if !roll_hit(dice, attacker.hit_rating, defender.dodge_rating) {
        return AttackResult::MISS;
    }

    let damage = roll_damage(
        attacker.attack_power,
        defender.defense_power,
        bonus,
        intent,
        rules,
        dice,
    );
    AttackResult::hit(damage)
}
