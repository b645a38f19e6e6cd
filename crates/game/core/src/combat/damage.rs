//! Damage calculation.
//!
//! # Formula
//!
//! ```text
//! raw    = ((attack - defense) + technique + force_bonus) × scale × jitter
//! lethal = raw > 0 ? max(1, floor(raw)) : 1 + roll(floor_max)
//! dealt  = sparring ? max(1, lethal / 2) : lethal
//! ```

use crate::config::{DamageRules, EnforceRules};
use crate::engagement::Intent;
use crate::state::SkillCategory;

use super::dice::Dice;

/// Additive and multiplicative terms on top of the power difference.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrikeBonus {
    pub technique_damage: f64,
    pub force_bonus: f64,
    pub scale: f64,
}

impl StrikeBonus {
    pub const NONE: Self = Self {
        technique_damage: 0.0,
        force_bonus: 0.0,
        scale: 1.0,
    };

    pub fn new(technique_damage: f64, force_bonus: f64) -> Self {
        Self {
            technique_damage,
            force_bonus,
            scale: 1.0,
        }
    }

    pub fn scaled(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }
}

impl Default for StrikeBonus {
    fn default() -> Self {
        Self::NONE
    }
}

/// Rolls the damage of a landed strike. Never returns 0.
pub fn roll_damage(
    attack_power: u32,
    defense_power: u32,
    bonus: &StrikeBonus,
    intent: Intent,
    rules: &DamageRules,
    dice: &mut Dice<'_>,
) -> u32 {
    let difference = f64::from(attack_power) - f64::from(defense_power);
    let raw = (difference + bonus.technique_damage + bonus.force_bonus) * bonus.scale;
    let jittered = raw * dice.jitter(rules.jitter_pct);

    let lethal = if jittered <= 0.0 || !jittered.is_finite() {
        1 + dice.below(rules.floor_max.max(1))
    } else {
        (jittered.floor().min(f64::from(u32::MAX)) as u32).max(1)
    };

    match intent {
        Intent::Lethal => lethal,
        Intent::Sparring => sparring_damage(lethal),
    }
}

/// Sparring halves damage but still deals at least 1.
pub fn sparring_damage(lethal: u32) -> u32 {
    (lethal / 2).max(1)
}

/// Base damage of the governing skill scaled by proficiency.
pub fn technique_damage(base_damage: u32, attack_skill: u32) -> f64 {
    f64::from(base_damage) * (100.0 + f64::from(attack_skill)) / 100.0
}

/// Force converted into bonus damage by the enforce overdrive.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ForceBurst {
    /// Force to deduct from the attacker.
    pub cost: u32,
    pub bonus: f64,
}

/// Spends up to `enforce × cost_per_level` of the available force.
///
/// The bonus grows with force proficiency and is reduced when the strike is
/// carried by a weapon rather than the body.
pub fn force_burst(
    available_force: u32,
    enforce: u8,
    force_level: u32,
    attack_type: SkillCategory,
    rules: &EnforceRules,
) -> ForceBurst {
    if enforce == 0 {
        return ForceBurst::default();
    }
    let cost = available_force.min(u32::from(enforce).saturating_mul(rules.cost_per_level));
    let factor = if attack_type == SkillCategory::Unarmed {
        rules.unarmed_factor
    } else {
        rules.weapon_factor
    };
    ForceBurst {
        cost,
        bonus: f64::from(cost) * (1.0 + f64::from(force_level) / 100.0) * factor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::PcgRng;
    use crate::env::testing::FixedRng;

    #[test]
    fn non_positive_raw_damage_hits_the_floor() {
        let rules = DamageRules::default();
        let rng = FixedRng(3);
        let mut dice = Dice::new(&rng, 0, 0);
        // 3 % 5 = 3 → 4
        let damage = roll_damage(10, 80, &StrikeBonus::NONE, Intent::Lethal, &rules, &mut dice);
        assert_eq!(damage, 4);
    }

    #[test]
    fn damage_is_never_zero() {
        let rules = DamageRules::default();
        let rng = PcgRng;
        let mut dice = Dice::new(&rng, 11, 2);
        for attack in 0..40 {
            for intent in [Intent::Lethal, Intent::Sparring] {
                let damage =
                    roll_damage(attack, 20, &StrikeBonus::NONE, intent, &rules, &mut dice);
                assert!(damage >= 1);
            }
        }
    }

    #[test]
    fn sparring_halves_the_same_roll() {
        let rules = DamageRules::default();
        let rng = PcgRng;
        for nonce in 0..50 {
            let mut lethal_dice = Dice::new(&rng, 5, nonce);
            let mut sparring_dice = Dice::new(&rng, 5, nonce);
            let bonus = StrikeBonus::new(7.5, 3.0);
            let lethal = roll_damage(90, 20, &bonus, Intent::Lethal, &rules, &mut lethal_dice);
            let sparring =
                roll_damage(90, 20, &bonus, Intent::Sparring, &rules, &mut sparring_dice);
            assert_eq!(sparring, (lethal / 2).max(1));
        }
    }

    #[test]
    fn neutral_jitter_reproduces_raw_difference() {
        let rules = DamageRules::default();
        let rng = FixedRng(100);
        let mut dice = Dice::new(&rng, 0, 0);
        let bonus = StrikeBonus::new(10.0, 5.0).scaled(2.0);
        assert_eq!(roll_damage(50, 20, &bonus, Intent::Lethal, &rules, &mut dice), 90);
    }

    #[test]
    fn technique_damage_scales_with_skill() {
        assert_eq!(technique_damage(20, 0), 20.0);
        assert_eq!(technique_damage(20, 50), 30.0);
    }

    #[test]
    fn force_burst_is_bounded_by_available_force() {
        let rules = EnforceRules::default();
        let unarmed = force_burst(100, 4, 50, SkillCategory::Unarmed, &rules);
        assert_eq!(unarmed.cost, 20);
        assert_eq!(unarmed.bonus, 30.0);

        let armed = force_burst(8, 4, 0, SkillCategory::Sword, &rules);
        assert_eq!(armed.cost, 8);
        assert_eq!(armed.bonus, 6.0);

        assert_eq!(force_burst(100, 0, 50, SkillCategory::Unarmed, &rules), ForceBurst::default());
    }
}
