//! Technique ("perform") gate and execution.
//!
//! [`check_technique`] validates every precondition without mutating
//! anything. [`commit_technique`] pays the cost and starts both cooldowns;
//! only then does [`execute_technique`] resolve the effects, so nothing that
//! happens during resolution can dodge the cost.

use crate::combat::{Dice, StrikeBonus, resolve_attack, technique_damage};
use crate::engagement::{CombatSession, EngagementEntry};
use crate::env::{Env, TechniqueDefinition, TechniqueKind};
use crate::lifecycle;
use crate::reward::Reward;
use crate::round::{RoundContext, RoundEvent, Tally};
use crate::state::{Character, OpponentKey, SkillCategory, SkillId, TechniqueId};

/// Why a technique cannot be used right now. Checked in declaration order.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PerformRejection {
    #[error("you are busy channelling your force")]
    Exercising,

    #[error("you are unconscious")]
    Unconscious,

    #[error("techniques can only be used in combat")]
    NotInCombat,

    #[error("you are occupied until {until}")]
    Busy { until: i64 },

    #[error("you need to recover before the next technique (until {until})")]
    GlobalCooldown { until: i64 },

    #[error("unknown technique '{0}'")]
    UnknownTechnique(TechniqueId),

    #[error("{skill} must be enabled to use this technique")]
    NotActivated { skill: SkillId },

    #[error("this technique requires {required}, you are using {equipped}")]
    WrongWeapon {
        required: SkillCategory,
        equipped: SkillCategory,
    },

    #[error("technique is not ready until {ready_at}")]
    OnCooldown { ready_at: i64 },

    #[error("not enough force: need {required}, have {available}")]
    InsufficientForce { required: u32, available: u32 },
}

/// Validates every precondition of `technique` for `player`.
pub fn check_technique(
    player: &Character,
    session: &CombatSession,
    technique: &TechniqueId,
    env: &Env<'_>,
    now: i64,
) -> Result<TechniqueDefinition, PerformRejection> {
    if player.exercising {
        return Err(PerformRejection::Exercising);
    }
    if player.is_unconscious() {
        return Err(PerformRejection::Unconscious);
    }
    if session.is_empty() {
        return Err(PerformRejection::NotInCombat);
    }
    if player.busy_until > now {
        return Err(PerformRejection::Busy {
            until: player.busy_until,
        });
    }
    if player.gcd_until > now {
        return Err(PerformRejection::GlobalCooldown {
            until: player.gcd_until,
        });
    }

    let definition = env
        .techniques()
        .technique(technique)
        .ok_or_else(|| PerformRejection::UnknownTechnique(technique.clone()))?;

    if !player.enabled.is_active(&definition.required_skill)
        || !player.skills.has(definition.required_skill.as_str())
    {
        return Err(PerformRejection::NotActivated {
            skill: definition.required_skill.clone(),
        });
    }

    let equipped = env.weapon_category(player.equipment.weapon());
    if equipped != definition.required_weapon {
        return Err(PerformRejection::WrongWeapon {
            required: definition.required_weapon,
            equipped,
        });
    }

    if let Some(ready_at) = player.cooldown(technique).filter(|ready_at| *ready_at > now) {
        return Err(PerformRejection::OnCooldown { ready_at });
    }

    if player.resources.force < definition.force_cost {
        return Err(PerformRejection::InsufficientForce {
            required: definition.force_cost,
            available: player.resources.force,
        });
    }

    Ok(definition)
}

/// Deducts the force cost and sets the technique and global cooldowns.
/// Returns the force spent.
pub fn commit_technique(
    player: &mut Character,
    technique: &TechniqueId,
    definition: &TechniqueDefinition,
    global_cooldown_ms: i64,
    now: i64,
) -> u32 {
    let spent = player.resources.spend_force(definition.force_cost);
    player
        .cooldowns
        .insert(technique.clone(), now.saturating_add(definition.cooldown_ms));
    player.gcd_until = now.saturating_add(global_cooldown_ms);
    spent
}

/// Picks the single target: an explicitly named opponent must already be
/// engaged; otherwise the head of the queue.
pub fn select_target(session: &CombatSession, requested: Option<&OpponentKey>) -> Option<OpponentKey> {
    match requested {
        Some(key) => session.get(key).map(|entry| entry.key.clone()),
        None => session.head().map(|entry| entry.key.clone()),
    }
}

/// Everything a technique did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PerformReport {
    pub events: Vec<RoundEvent>,
    pub health_updates: Vec<(OpponentKey, u32)>,
    /// Bystanders force-engaged by an area technique.
    pub engaged: Vec<OpponentKey>,
    /// The technique emptied the session; the engagement is over.
    pub session_empty: bool,
}

impl PerformReport {
    pub fn defeats(&self) -> impl Iterator<Item = &Reward> {
        self.events.iter().filter_map(|event| match event {
            RoundEvent::OpponentDefeated(reward) => Some(reward),
            _ => None,
        })
    }
}

/// Resolves the effects of an already committed technique.
///
/// `target` is used by single-target kinds; area techniques hit every session
/// entry plus the `bystanders` (room opponents outside the session, with
/// lethal intent). Bystanders that survive join the session.
#[allow(clippy::too_many_arguments)]
pub fn execute_technique(
    ctx: &RoundContext<'_>,
    player: &mut Character,
    session: &mut CombatSession,
    technique: &TechniqueId,
    definition: &TechniqueDefinition,
    target: Option<&OpponentKey>,
    bystanders: Vec<EngagementEntry>,
    dice: &mut Dice<'_>,
) -> PerformReport {
    let mut tally = Tally::default();
    let mut engaged = Vec::new();
    let bonus = technique_bonus(ctx, player, definition);

    match &definition.kind {
        TechniqueKind::Aoe => {
            for key in session.keys() {
                strike_session_entry(ctx, player, session, technique, &key, &bonus, &mut tally, dice);
            }
            for mut bystander in bystanders {
                if session.contains(&bystander.key) || !bystander.is_live() {
                    continue;
                }
                if strike_entry(ctx, player, &mut bystander, technique, &bonus, &mut tally, dice) {
                    tally.defeat(ctx, player, bystander, false, session, dice);
                } else {
                    tally.events.push(RoundEvent::OpponentEngaged {
                        key: bystander.key.clone(),
                    });
                    engaged.push(bystander.key.clone());
                    session.push(bystander);
                }
            }
        }
        kind => {
            if let Some(key) = target {
                for _ in 0..definition.strikes() {
                    let fell = strike_session_entry(
                        ctx, player, session, technique, key, &bonus, &mut tally, dice,
                    );
                    if fell || !session.contains(key) {
                        break;
                    }
                }
                if let TechniqueKind::BuffDebuff { duration_ms, .. } = kind {
                    if let Some(entry) = session.get_mut(key) {
                        let until = ctx.now.saturating_add(*duration_ms);
                        entry.restrain_until(until);
                        tally.events.push(RoundEvent::OpponentRestrained {
                            key: key.clone(),
                            until: entry.restrained_until,
                        });
                    }
                }
            }
        }
    }

    let session_empty = session.is_empty();
    if session_empty {
        lifecycle::end_combat(player);
    }

    PerformReport {
        events: tally.events,
        health_updates: tally.health_updates,
        engaged,
        session_empty,
    }
}

/// Damage of the required skill, scaled by the technique and by enforce.
fn technique_bonus(
    ctx: &RoundContext<'_>,
    player: &Character,
    definition: &TechniqueDefinition,
) -> StrikeBonus {
    let stats = ctx.stats(player);
    let base_damage = ctx.env.skill_or_default(&definition.required_skill).base_damage;
    let overdrive =
        1.0 + ctx.config.enforce.technique_scale_per_level * f64::from(player.combat.enforce);
    StrikeBonus::new(technique_damage(base_damage, stats.attack_skill), 0.0)
        .scaled(definition.damage_scale * overdrive)
}

/// Strikes a session entry; a fallen entry is removed and paid out. Returns
/// whether it fell.
#[allow(clippy::too_many_arguments)]
fn strike_session_entry(
    ctx: &RoundContext<'_>,
    player: &mut Character,
    session: &mut CombatSession,
    technique: &TechniqueId,
    key: &OpponentKey,
    bonus: &StrikeBonus,
    tally: &mut Tally,
    dice: &mut Dice<'_>,
) -> bool {
    let was_head = session.head().is_some_and(|head| &head.key == key);
    let Some(entry) = session.get_mut(key) else {
        return false;
    };
    if !strike_entry(ctx, player, entry, technique, bonus, tally, dice) {
        return false;
    }
    if let Some(entry) = session.remove(key) {
        tally.defeat(ctx, player, entry, was_head, session, dice);
    }
    true
}

fn strike_entry(
    ctx: &RoundContext<'_>,
    player: &Character,
    entry: &mut EngagementEntry,
    technique: &TechniqueId,
    bonus: &StrikeBonus,
    tally: &mut Tally,
    dice: &mut Dice<'_>,
) -> bool {
    let attacker = ctx.stats(player);
    let defender = ctx.stats(&entry.snapshot);
    let result = resolve_attack(&attacker, &defender, bonus, entry.intent, &ctx.config.damage, dice);
    tally.events.push(RoundEvent::TechniqueStrike {
        technique: technique.clone(),
        target: entry.key.clone(),
        result,
    });
    match result.damage {
        Some(damage) => tally.wound(entry, damage),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CombatConfig;
    use crate::engagement::Intent;
    use crate::env::testing::{FixedRng, TestOracles};
    use crate::env::{ItemDefinition, NpcTemplate, StatusEffect};
    use crate::state::{Attributes, EnabledSkills, Equipment, RoomId, SkillBook, Slot, TemplateId};

    const ROOM: &str = "hall";

    fn oracles() -> TestOracles {
        let mut oracles = TestOracles::default();
        oracles.techniques.insert(
            "storm".into(),
            TechniqueDefinition::new("Palm Storm", "iron-palm", SkillCategory::Unarmed, TechniqueKind::Aoe)
                .with_cost(30, 10_000),
        );
        oracles.techniques.insert(
            "flurry".into(),
            TechniqueDefinition::new(
                "Flurry",
                "iron-palm",
                SkillCategory::Unarmed,
                TechniqueKind::MultiHit { hits: 3 },
            )
            .with_cost(10, 4_000),
        );
        oracles.techniques.insert(
            "bind".into(),
            TechniqueDefinition::new(
                "Binding Palm",
                "iron-palm",
                SkillCategory::Unarmed,
                TechniqueKind::BuffDebuff {
                    effect: StatusEffect::Restrained,
                    duration_ms: 6_000,
                },
            ),
        );
        oracles.items.insert(
            "sabre".into(),
            ItemDefinition::weapon("sabre", SkillCategory::Blade, 5, 0),
        );
        let mut thug = NpcTemplate::new("Thug");
        thug.attributes = Attributes::uniform(0);
        oracles.npcs.insert("thug".into(), thug);
        oracles
    }

    fn adept() -> Character {
        let mut player = Character::new("p1", "Adept", ROOM)
            .with_attributes(Attributes::new(5, 0, 100, 0, 0, 0))
            .with_skills(SkillBook::new().with("unarmed", 20).with("iron-palm", 10))
            .with_enabled(EnabledSkills::new().with(SkillCategory::Unarmed, "iron-palm"));
        player.state = crate::state::CharacterState::Fighting;
        player
    }

    fn thug(oracles: &TestOracles, index: u32, health: u32) -> EngagementEntry {
        let key = OpponentKey::new(RoomId::new(ROOM), TemplateId::new("thug"), index);
        EngagementEntry::new(key, &oracles.npcs[&TemplateId::new("thug")], health, Intent::Lethal, 1.0)
    }

    fn engaged(oracles: &TestOracles) -> CombatSession {
        let mut session = CombatSession::new();
        session.push(thug(oracles, 0, 100));
        session
    }

    #[test]
    fn gate_checks_run_in_order() {
        let oracles = oracles();
        let rng = FixedRng(0);
        let env = oracles.env(&rng);
        let storm = TechniqueId::new("storm");

        let mut player = adept();
        player.exercising = true;
        player.resources.force = 0;
        let idle = CombatSession::new();
        assert_eq!(
            check_technique(&player, &idle, &storm, &env, 0),
            Err(PerformRejection::Exercising)
        );

        player.exercising = false;
        assert_eq!(
            check_technique(&player, &idle, &storm, &env, 0),
            Err(PerformRejection::NotInCombat)
        );

        let session = engaged(&oracles);
        player.gcd_until = 500;
        assert_eq!(
            check_technique(&player, &session, &storm, &env, 0),
            Err(PerformRejection::GlobalCooldown { until: 500 })
        );

        player.gcd_until = 0;
        assert_eq!(
            check_technique(&player, &session, &TechniqueId::new("nope"), &env, 0),
            Err(PerformRejection::UnknownTechnique(TechniqueId::new("nope")))
        );
        assert_eq!(
            check_technique(&player, &session, &storm, &env, 0),
            Err(PerformRejection::InsufficientForce {
                required: 30,
                available: 0
            })
        );
    }

    #[test]
    fn possession_without_activation_is_not_enough() {
        let oracles = oracles();
        let rng = FixedRng(0);
        let env = oracles.env(&rng);
        let session = engaged(&oracles);

        let mut player = adept();
        player.enabled = EnabledSkills::new();
        assert_eq!(
            check_technique(&player, &session, &TechniqueId::new("storm"), &env, 0),
            Err(PerformRejection::NotActivated {
                skill: SkillId::new("iron-palm")
            })
        );
    }

    #[test]
    fn unarmed_techniques_reject_weapons() {
        let oracles = oracles();
        let rng = FixedRng(0);
        let env = oracles.env(&rng);
        let session = engaged(&oracles);

        let player = adept().with_equipment(Equipment::empty().with(Slot::Weapon, "sabre"));
        assert_eq!(
            check_technique(&player, &session, &TechniqueId::new("storm"), &env, 0),
            Err(PerformRejection::WrongWeapon {
                required: SkillCategory::Unarmed,
                equipped: SkillCategory::Blade
            })
        );
    }

    #[test]
    fn cooldowns_only_start_on_commit() {
        let oracles = oracles();
        let rng = FixedRng(0);
        let env = oracles.env(&rng);
        let session = engaged(&oracles);
        let flurry = TechniqueId::new("flurry");

        let mut player = adept();
        player.resources.force = 5;
        assert!(matches!(
            check_technique(&player, &session, &flurry, &env, 0),
            Err(PerformRejection::InsufficientForce { .. })
        ));
        assert_eq!(player.cooldown(&flurry), None);
        assert_eq!(player.gcd_until, 0);

        player.resources.force = 50;
        let definition = check_technique(&player, &session, &flurry, &env, 0);
        let Ok(definition) = definition else {
            panic!("flurry should pass the gate: {definition:?}");
        };
        assert_eq!(commit_technique(&mut player, &flurry, &definition, 2_000, 0), 10);
        assert_eq!(player.resources.force, 40);

        assert_eq!(
            check_technique(&player, &session, &flurry, &env, 1_000),
            Err(PerformRejection::GlobalCooldown { until: 2_000 })
        );
        assert_eq!(
            check_technique(&player, &session, &flurry, &env, 2_500),
            Err(PerformRejection::OnCooldown { ready_at: 4_000 })
        );
        assert!(check_technique(&player, &session, &flurry, &env, 4_000).is_ok());
    }

    #[test]
    fn explicit_targets_must_be_engaged() {
        let oracles = oracles();
        let session = engaged(&oracles);
        let tracked = thug(&oracles, 0, 100).key;
        let stranger = thug(&oracles, 7, 100).key;

        assert_eq!(select_target(&session, Some(&tracked)), Some(tracked.clone()));
        assert_eq!(select_target(&session, Some(&stranger)), None);
        assert_eq!(select_target(&session, None), Some(tracked));
        assert_eq!(select_target(&CombatSession::new(), None), None);
    }

    #[test]
    fn area_technique_kills_the_weak_and_engages_survivors() {
        // attack power 10 + 20×1.5 = 40 vs defense 0, neutral jitter: 40 per hit.
        let oracles = oracles();
        let rng = FixedRng(100);
        let env = oracles.env(&rng);
        let config = CombatConfig::default();
        let ctx = RoundContext::new(env, &config, 1_000);
        let storm = TechniqueId::new("storm");
        let definition = oracles.techniques[&storm].clone();

        let mut player = adept();
        let mut session = CombatSession::new();
        session.push(thug(&oracles, 0, 30));
        session.push(thug(&oracles, 1, 35));
        let bystanders = vec![thug(&oracles, 2, 100)];

        commit_technique(&mut player, &storm, &definition, config.global_cooldown_ms, ctx.now);
        let mut dice = Dice::new(&rng, 1, 1);
        let report = execute_technique(
            &ctx,
            &mut player,
            &mut session,
            &storm,
            &definition,
            None,
            bystanders,
            &mut dice,
        );

        let defeated: Vec<u32> = report.defeats().map(|reward| reward.key.index).collect();
        assert_eq!(defeated, vec![0, 1]);
        assert!(report
            .defeats()
            .all(|reward| reward.respawn_at == Some(1_000 + config.respawn_delay_ms)));
        assert_eq!(report.engaged.len(), 1);
        assert_eq!(session.len(), 1);
        assert_eq!(session.head().map(|entry| entry.current_health), Some(60));
        assert!(!report.session_empty);
        assert_eq!(player.combat.kills, 2);
    }

    #[test]
    fn multi_hit_stops_when_the_target_falls() {
        let oracles = oracles();
        let rng = FixedRng(100);
        let env = oracles.env(&rng);
        let config = CombatConfig::default();
        let ctx = RoundContext::new(env, &config, 0);
        let flurry = TechniqueId::new("flurry");
        let definition = oracles.techniques[&flurry].clone();

        let mut player = adept();
        let mut session = CombatSession::new();
        session.push(thug(&oracles, 0, 70));
        let target = select_target(&session, None);

        let mut dice = Dice::new(&rng, 1, 1);
        let report = execute_technique(
            &ctx,
            &mut player,
            &mut session,
            &flurry,
            &definition,
            target.as_ref(),
            Vec::new(),
            &mut dice,
        );

        let strikes = report
            .events
            .iter()
            .filter(|event| matches!(event, RoundEvent::TechniqueStrike { .. }))
            .count();
        assert_eq!(strikes, 2);
        assert!(report.session_empty);
        assert_eq!(player.state, crate::state::CharacterState::Normal);
    }

    #[test]
    fn binding_technique_restrains_the_survivor() {
        let oracles = oracles();
        let rng = FixedRng(100);
        let env = oracles.env(&rng);
        let config = CombatConfig::default();
        let ctx = RoundContext::new(env, &config, 2_000);
        let bind = TechniqueId::new("bind");
        let definition = oracles.techniques[&bind].clone();

        let mut player = adept();
        let mut session = engaged(&oracles);
        let target = select_target(&session, None);

        let mut dice = Dice::new(&rng, 1, 1);
        execute_technique(
            &ctx,
            &mut player,
            &mut session,
            &bind,
            &definition,
            target.as_ref(),
            Vec::new(),
            &mut dice,
        );

        let entry = session.head().map(|entry| (entry.current_health, entry.restrained_until));
        assert_eq!(entry, Some((60, 8_000)));
    }

    #[test]
    fn enforce_amplifies_technique_damage() {
        let oracles = oracles();
        let rng = FixedRng(100);
        let env = oracles.env(&rng);
        let config = CombatConfig::default();
        let ctx = RoundContext::new(env, &config, 0);
        let bind = TechniqueId::new("bind");
        let definition = oracles.techniques[&bind].clone();

        let mut player = adept();
        player.set_enforce(10);
        let mut session = CombatSession::new();
        session.push(thug(&oracles, 0, 95));
        let target = select_target(&session, None);

        let mut dice = Dice::new(&rng, 1, 1);
        execute_technique(
            &ctx,
            &mut player,
            &mut session,
            &bind,
            &definition,
            target.as_ref(),
            Vec::new(),
            &mut dice,
        );
        // 40 × (1 + 0.15 × 10) = 100
        assert!(session.is_empty());
    }
}
