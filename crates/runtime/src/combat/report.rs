//! Turns rule reports into narration, progress events and store writes.

use tracing::{debug, info};
use wulin_core::{EngagementEntry, EntityId, Intent, OpponentKey, Reward, RoomId, RoundEvent};

use crate::events::{DisengageReason, Narration, ProgressEvent};
use crate::repository::{OpponentRecord, Pickup};
use crate::runtime::Runtime;

use super::PlayerSlot;

/// The character a rule event is about.
fn origin(player: &EntityId, event: &RoundEvent) -> EntityId {
    match event {
        RoundEvent::OpponentStrike { attacker: key, .. }
        | RoundEvent::OpponentWeakened { key, .. }
        | RoundEvent::OpponentRestrained { key, .. }
        | RoundEvent::OpponentEngaged { key } => key.entity_id(),
        RoundEvent::OpponentDefeated(reward) => reward.key.entity_id(),
        _ => player.clone(),
    }
}

impl Runtime {
    /// Narrates `events` in `room` and records defeats and deaths.
    pub(crate) async fn publish_events(
        &self,
        slot: &PlayerSlot,
        room: &RoomId,
        events: &[RoundEvent],
        now: i64,
    ) {
        let player = &slot.character.id;
        for event in events {
            self.notifier()
                .narrate(room, &origin(player, event), Narration::Combat(event.clone()));

            match event {
                RoundEvent::OpponentDefeated(reward) => {
                    self.record_defeat(slot, room, reward, now).await;
                }
                RoundEvent::PlayerDied { by, report } => {
                    info!(
                        target: "runtime::lifecycle",
                        player = %player,
                        by = %by,
                        skills_reduced = report.skills_reduced,
                        return_at = report.return_at,
                        "player died"
                    );
                    self.notifier().progress(ProgressEvent::DeathPenalty {
                        player: player.clone(),
                        skills_reduced: report.skills_reduced,
                        return_at: report.return_at,
                    });
                    self.notifier().narrate(&report.limbo, player, Narration::Arrived);
                    self.schedule_limbo_return(player.clone(), report.return_at, now);
                }
                RoundEvent::PlayerKnockedOut { by } => {
                    info!(target: "runtime::lifecycle", player = %player, by = %by, "player knocked out");
                }
                RoundEvent::PlayerEjected { by } => {
                    info!(target: "runtime::lifecycle", player = %player, by = %by, "player lost a sparring match");
                }
                _ => {}
            }
        }
    }

    async fn record_defeat(&self, slot: &PlayerSlot, room: &RoomId, reward: &Reward, now: i64) {
        let player = &slot.character;
        info!(
            target: "runtime::engage",
            player = %player.id,
            opponent = %reward.key,
            intent = ?reward.intent,
            potential = reward.potential,
            loot = reward.loot.len(),
            "opponent defeated"
        );

        let key = reward.key.clone();
        self.write("clear_opponent", move |store| async move {
            store.clear_opponent(&key).await
        })
        .await;

        if let Some(ready_at) = reward.respawn_at {
            let key = reward.key.clone();
            self.write("schedule_respawn", move |store| async move {
                store.schedule_respawn(&key, ready_at).await
            })
            .await;
        }

        for item in &reward.loot {
            let pickup = Pickup {
                item: item.clone(),
                room: room.clone(),
                dropped_at: now,
            };
            self.write("drop_item", move |store| async move {
                store.drop_item(pickup).await
            })
            .await;
            self.notifier().narrate(
                room,
                &reward.key.entity_id(),
                Narration::LootDropped { item: item.clone() },
            );
        }

        self.notifier().progress(ProgressEvent::PotentialGained {
            player: player.id.clone(),
            amount: reward.potential,
            total: player.combat.potential,
        });
        if reward.intent == Intent::Lethal {
            self.notifier().progress(ProgressEvent::KillRecorded {
                player: player.id.clone(),
                kills: player.combat.kills,
            });
        }
    }

    /// Writes the surviving opponents' new health to their shared records.
    pub(crate) async fn persist_health(&self, room: &RoomId, updates: &[(OpponentKey, u32)], now: i64) {
        for (key, health) in updates {
            let max_health = self
                .oracles()
                .npcs()
                .max_health(&key.template)
                .unwrap_or(*health);
            let record = OpponentRecord {
                health: *health,
                max_health,
                room: room.clone(),
                unconscious: false,
                touched_at: now,
            };
            let key = key.clone();
            self.write("save_opponent", move |store| async move {
                store.save_opponent(&key, record).await
            })
            .await;
        }
    }

    /// Marks `entry` as present and in play.
    pub(crate) async fn touch_opponent(&self, entry: &EngagementEntry, now: i64) {
        let record = OpponentRecord {
            health: entry.current_health,
            max_health: entry.max_health,
            room: entry.room().clone(),
            unconscious: entry.unconscious,
            touched_at: now,
        };
        let key = entry.key.clone();
        self.write("save_opponent", move |store| async move {
            store.save_opponent(&key, record).await
        })
        .await;
    }

    /// Stops the ticker after the engagement ended and tells the room why.
    pub(crate) fn finish_engagement(
        &self,
        slot: &mut PlayerSlot,
        room: &RoomId,
        reason: DisengageReason,
        woke: bool,
    ) {
        slot.stop_ticker();
        let player = &slot.character.id;
        debug!(target: "runtime::engage", player = %player, ?reason, "engagement over");
        self.notifier()
            .narrate(room, player, Narration::Disengaged { reason });
        if woke {
            self.notifier().narrate(room, player, Narration::Woke);
        }
    }
}
