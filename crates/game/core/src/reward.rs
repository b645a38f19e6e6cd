//! Rewards for defeating an opponent.
//!
//! Sparring wins pay a small fixed amount and leave no trace. Lethal wins pay
//! by level difference, scaled down for trivially weak opponents, roll the
//! loot table and schedule the instance's respawn.

use crate::combat::Dice;
use crate::config::{CombatConfig, RewardRules};
use crate::engagement::{EngagementEntry, Intent};
use crate::env::Env;
use crate::state::{Character, ItemId, OpponentKey};
use crate::stats::entity_level;

/// What the player gained and what the world must record.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reward {
    pub key: OpponentKey,
    pub display_name: String,
    pub intent: Intent,
    pub potential: u64,
    /// Items dropped into the room.
    pub loot: Vec<ItemId>,
    /// Epoch-ms after which the instance can be engaged again. Only lethal
    /// defeats schedule a respawn.
    pub respawn_at: Option<i64>,
}

/// `max(minimum, base + per_level × (opponent − player))`, zeroed below the
/// trivial ratio and halved below the easy ratio.
pub fn potential_reward(player_level: u32, opponent_level: u32, ratio: f64, rules: &RewardRules) -> u64 {
    let difference = i64::from(opponent_level) - i64::from(player_level);
    let reward = rules
        .base
        .saturating_add(rules.per_level.saturating_mul(difference))
        .max(rules.minimum)
        .max(0) as u64;

    if ratio < rules.trivial_ratio {
        0
    } else if ratio < rules.easy_ratio {
        reward / 2
    } else {
        reward
    }
}

/// Pays out the defeat of `entry` to `player` and reports what the world must
/// record. The entry must already be out of the session.
pub fn resolve_defeat(
    player: &mut Character,
    entry: &EngagementEntry,
    env: &Env<'_>,
    config: &CombatConfig,
    now: i64,
    dice: &mut Dice<'_>,
) -> Reward {
    let mut reward = Reward {
        key: entry.key.clone(),
        display_name: entry.display_name.clone(),
        intent: entry.intent,
        potential: 0,
        loot: Vec::new(),
        respawn_at: None,
    };

    match entry.intent {
        Intent::Sparring => {
            reward.potential = config.sparring_potential;
        }
        Intent::Lethal => {
            reward.potential = potential_reward(
                entity_level(player, env),
                entity_level(&entry.snapshot, env),
                entry.difficulty_ratio,
                &config.reward,
            );
            if let Some(template) = env.npcs().template(&entry.key.template) {
                reward.loot = template
                    .loot
                    .iter()
                    .filter(|drop| dice.chance(drop.rate))
                    .map(|drop| drop.item.clone())
                    .collect();
            }
            reward.respawn_at = Some(now.saturating_add(config.respawn_delay_ms));
            player.combat.kills = player.combat.kills.saturating_add(1);
        }
    }

    player.combat.potential = player.combat.potential.saturating_add(reward.potential);
    reward
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::testing::{FixedRng, TestOracles};
    use crate::env::{LootDrop, NpcTemplate};
    use crate::state::{RoomId, SkillBook, TemplateId};

    #[test]
    fn reward_follows_level_difference() {
        let rules = RewardRules::default();
        assert_eq!(potential_reward(10, 10, 1.0, &rules), 100);
        assert_eq!(potential_reward(10, 15, 1.0, &rules), 150);
        assert_eq!(potential_reward(30, 10, 1.0, &rules), 10);
    }

    #[test]
    fn weak_opponents_pay_less() {
        let rules = RewardRules::default();
        assert_eq!(potential_reward(10, 10, 0.79, &rules), 50);
        assert_eq!(potential_reward(10, 10, 0.49, &rules), 0);
        assert_eq!(potential_reward(10, 10, 0.8, &rules), 100);
    }

    fn bandit(intent: Intent) -> (TestOracles, EngagementEntry) {
        let mut oracles = TestOracles::default();
        let mut template = NpcTemplate::new("Bandit");
        template.skills = SkillBook::new().with("blade", 20);
        template.loot = vec![LootDrop::new("copper", 0.5), LootDrop::new("jade", 0.0)];
        oracles.npcs.insert("bandit".into(), template.clone());
        let key = OpponentKey::new(RoomId::new("pass"), TemplateId::new("bandit"), 0);
        let entry = EngagementEntry::new(key, &template, 0, intent, 1.0);
        (oracles, entry)
    }

    #[test]
    fn lethal_defeat_rolls_loot_and_schedules_respawn() {
        let (oracles, entry) = bandit(Intent::Lethal);
        let rng = FixedRng(0);
        let env = oracles.env(&rng);
        let config = CombatConfig::default();
        let mut dice = Dice::new(&rng, 0, 0);
        let mut player = Character::new("p1", "Tester", "pass")
            .with_skills(SkillBook::new().with("sword", 20));

        let reward = resolve_defeat(&mut player, &entry, &env, &config, 1_000, &mut dice);

        assert_eq!(reward.potential, 100);
        assert_eq!(reward.loot, vec![ItemId::new("copper")]);
        assert_eq!(reward.respawn_at, Some(1_000 + config.respawn_delay_ms));
        assert_eq!(player.combat.kills, 1);
        assert_eq!(player.combat.potential, 100);
    }

    #[test]
    fn sparring_defeat_pays_fixed_amount_only() {
        let (oracles, entry) = bandit(Intent::Sparring);
        let rng = FixedRng(0);
        let env = oracles.env(&rng);
        let config = CombatConfig::default();
        let mut dice = Dice::new(&rng, 0, 0);
        let mut player = Character::new("p1", "Tester", "pass");

        let reward = resolve_defeat(&mut player, &entry, &env, &config, 1_000, &mut dice);

        assert_eq!(reward.potential, config.sparring_potential);
        assert!(reward.loot.is_empty());
        assert_eq!(reward.respawn_at, None);
        assert_eq!(player.combat.kills, 0);
        assert_eq!(dice.draws(), 0);
    }
}
