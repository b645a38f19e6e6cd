//! One tick of an engagement.
//!
//! [`resolve_round`] runs the player's strike against the head of the queue,
//! then one strike from every live opponent in queue order, and reports what
//! happened. The caller owns scheduling, persistence and narration; this
//! module only mutates the snapshots it is handed.

use crate::combat::{
    AttackResult, Dice, HealthBand, StrikeBonus, force_burst, resolve_attack, technique_damage,
};
use crate::config::CombatConfig;
use crate::engagement::{CombatSession, EngagementEntry, Intent};
use crate::env::Env;
use crate::lifecycle::{self, DeathReport};
use crate::reward::{Reward, resolve_defeat};
use crate::state::{Character, OpponentKey, SkillId, TechniqueId};
use crate::stats::{CombatStats, derive_stats};

/// Read-only inputs shared by every strike of a round or technique.
#[derive(Clone, Copy, Debug)]
pub struct RoundContext<'a> {
    pub env: Env<'a>,
    pub config: &'a CombatConfig,
    /// Epoch-ms.
    pub now: i64,
}

impl<'a> RoundContext<'a> {
    pub fn new(env: Env<'a>, config: &'a CombatConfig, now: i64) -> Self {
        Self { env, config, now }
    }

    pub(crate) fn stats(&self, character: &Character) -> CombatStats {
        derive_stats(character, &self.env, &self.config.coefficients)
    }
}

/// Something worth narrating or persisting.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RoundEvent {
    PlayerStrike {
        target: OpponentKey,
        skill: SkillId,
        result: AttackResult,
        force_spent: u32,
    },
    TechniqueStrike {
        technique: TechniqueId,
        target: OpponentKey,
        result: AttackResult,
    },
    OpponentStrike {
        attacker: OpponentKey,
        result: AttackResult,
    },
    OpponentWeakened {
        key: OpponentKey,
        band: HealthBand,
    },
    PlayerWeakened {
        band: HealthBand,
    },
    OpponentRestrained {
        key: OpponentKey,
        until: i64,
    },
    /// A bystander was pulled into the fight.
    OpponentEngaged {
        key: OpponentKey,
    },
    OpponentDefeated(Reward),
    Retargeted {
        head: OpponentKey,
    },
    PlayerKnockedOut {
        by: OpponentKey,
    },
    PlayerEjected {
        by: OpponentKey,
    },
    PlayerDied {
        by: OpponentKey,
        report: DeathReport,
    },
}

/// Why the engagement stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RoundEnd {
    /// Every opponent was defeated or removed.
    SessionEmpty,
    /// The player is no longer in the head opponent's room.
    LeftRoom,
    /// Lost a sparring match.
    Ejected,
    Died,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RoundReport {
    pub events: Vec<RoundEvent>,
    /// Opponents that took damage and survived, with their new health.
    pub health_updates: Vec<(OpponentKey, u32)>,
    /// Set when the engagement must stop; the session has been cleared.
    pub end: Option<RoundEnd>,
}

impl RoundReport {
    pub fn defeats(&self) -> impl Iterator<Item = &Reward> {
        self.events.iter().filter_map(|event| match event {
            RoundEvent::OpponentDefeated(reward) => Some(reward),
            _ => None,
        })
    }

    pub fn death(&self) -> Option<&DeathReport> {
        self.events.iter().find_map(|event| match event {
            RoundEvent::PlayerDied { report, .. } => Some(report),
            _ => None,
        })
    }

    fn ended(end: RoundEnd) -> Self {
        Self {
            end: Some(end),
            ..Self::default()
        }
    }
}

/// Resolves one tick for `player` against `session`.
pub fn resolve_round(
    ctx: &RoundContext<'_>,
    player: &mut Character,
    session: &mut CombatSession,
    dice: &mut Dice<'_>,
) -> RoundReport {
    let Some(head) = session.head() else {
        lifecycle::end_combat(player);
        return RoundReport::ended(RoundEnd::SessionEmpty);
    };
    if head.room() != &player.location {
        session.clear();
        lifecycle::end_combat(player);
        return RoundReport::ended(RoundEnd::LeftRoom);
    }

    let mut tally = Tally::default();

    if !player.is_unconscious() {
        player_strike(ctx, player, session, &mut tally, dice);
    }

    let mut end = opponents_strike(ctx, player, session, &mut tally, dice);
    if end.is_none() && session.is_empty() {
        lifecycle::end_combat(player);
        end = Some(RoundEnd::SessionEmpty);
    }

    RoundReport {
        events: tally.events,
        health_updates: tally.health_updates,
        end,
    }
}

/// Shared accumulator for rounds and techniques.
#[derive(Default)]
pub(crate) struct Tally {
    pub(crate) events: Vec<RoundEvent>,
    pub(crate) health_updates: Vec<(OpponentKey, u32)>,
}

impl Tally {
    /// Applies `damage` to `entry`. Returns true when it fell.
    pub(crate) fn wound(&mut self, entry: &mut EngagementEntry, damage: u32) -> bool {
        let before = entry.current_health;
        let after = entry.take_damage(damage);
        if after == 0 {
            return true;
        }
        self.health_updates.push((entry.key.clone(), after));
        if let Some(band) = HealthBand::crossed(before, after, entry.max_health) {
            self.events.push(RoundEvent::OpponentWeakened {
                key: entry.key.clone(),
                band,
            });
        }
        false
    }

    /// Pays out a fallen entry that is no longer in `session`.
    pub(crate) fn defeat(
        &mut self,
        ctx: &RoundContext<'_>,
        player: &mut Character,
        entry: EngagementEntry,
        was_head: bool,
        session: &CombatSession,
        dice: &mut Dice<'_>,
    ) {
        let reward = resolve_defeat(player, &entry, &ctx.env, ctx.config, ctx.now, dice);
        self.events.push(RoundEvent::OpponentDefeated(reward));
        if was_head {
            if let Some(head) = session.head() {
                self.events.push(RoundEvent::Retargeted {
                    head: head.key.clone(),
                });
            }
        }
    }
}

fn player_strike(
    ctx: &RoundContext<'_>,
    player: &mut Character,
    session: &mut CombatSession,
    tally: &mut Tally,
    dice: &mut Dice<'_>,
) {
    let Some(target) = session.head() else {
        return;
    };
    let key = target.key.clone();
    let defender = ctx.stats(&target.snapshot);
    let (skill, result, force_spent) = strike(ctx, player, &defender, target.intent, dice);

    tally.events.push(RoundEvent::PlayerStrike {
        target: key.clone(),
        skill,
        result,
        force_spent,
    });

    let Some(damage) = result.damage else {
        return;
    };
    let fell = session
        .head_mut()
        .is_some_and(|entry| tally.wound(entry, damage));
    if fell {
        if let Some(entry) = session.remove(&key) {
            tally.defeat(ctx, player, entry, true, session, dice);
        }
    }
}

fn opponents_strike(
    ctx: &RoundContext<'_>,
    player: &mut Character,
    session: &mut CombatSession,
    tally: &mut Tally,
    dice: &mut Dice<'_>,
) -> Option<RoundEnd> {
    let defender = ctx.stats(player);

    for key in session.keys() {
        let Some(entry) = session.get_mut(&key) else {
            continue;
        };
        if !entry.is_live() || entry.is_restrained(ctx.now) {
            continue;
        }
        let intent = entry.intent;
        let (_, result, _) = strike(ctx, &mut entry.snapshot, &defender, intent, dice);
        tally.events.push(RoundEvent::OpponentStrike {
            attacker: key.clone(),
            result,
        });

        let Some(damage) = result.damage else {
            continue;
        };
        let before = player.resources.health;
        let after = player.resources.take_damage(damage);
        if after > 0 {
            if let Some(band) = HealthBand::crossed(before, after, player.resources.max_health) {
                tally.events.push(RoundEvent::PlayerWeakened { band });
            }
            continue;
        }

        return collapse(ctx, player, session, tally, key, intent);
    }
    None
}

/// The player dropped to 0 health from `by`'s strike.
fn collapse(
    ctx: &RoundContext<'_>,
    player: &mut Character,
    session: &mut CombatSession,
    tally: &mut Tally,
    by: OpponentKey,
    intent: Intent,
) -> Option<RoundEnd> {
    match intent {
        Intent::Sparring => {
            lifecycle::eject(player);
            session.clear();
            tally.events.push(RoundEvent::PlayerEjected { by });
            Some(RoundEnd::Ejected)
        }
        Intent::Lethal if player.is_unconscious() => {
            let report = lifecycle::die(player, ctx.config, ctx.now);
            session.clear();
            tally.events.push(RoundEvent::PlayerDied { by, report });
            Some(RoundEnd::Died)
        }
        Intent::Lethal => {
            lifecycle::knock_out(player);
            tally.events.push(RoundEvent::PlayerKnockedOut { by });
            None
        }
    }
}

/// An ordinary strike by `attacker`: governing skill damage plus the enforce
/// burst, which is paid whether or not the strike lands.
fn strike(
    ctx: &RoundContext<'_>,
    attacker: &mut Character,
    defender: &CombatStats,
    intent: Intent,
    dice: &mut Dice<'_>,
) -> (SkillId, AttackResult, u32) {
    let stats = ctx.stats(attacker);
    let skill = attacker.enabled.governing(stats.attack_type);
    let base_damage = ctx.env.skill_or_default(&skill).base_damage;

    let burst = force_burst(
        attacker.resources.force,
        attacker.combat.enforce,
        stats.force_level,
        stats.attack_type,
        &ctx.config.enforce,
    );
    let force_spent = attacker.resources.spend_force(burst.cost);

    let bonus = StrikeBonus::new(technique_damage(base_damage, stats.attack_skill), burst.bonus);
    let result = resolve_attack(&stats, defender, &bonus, intent, &ctx.config.damage, dice);
    (skill, result, force_spent)
}
