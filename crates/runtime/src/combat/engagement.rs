//! Starting, extending and ending engagements.

use tracing::{debug, info, warn};
use wulin_core::{
    Character, CharacterState, CombatConfig, EngagementEntry, EntityId, Env, Intent, NpcTemplate,
    OpponentKey, OpponentRef, PerformRejection, combat_power, derive_stats, difficulty_ratio,
    lifecycle,
};

use crate::api::{Result, RuntimeError};
use crate::events::{DisengageReason, Narration};
use crate::runtime::Runtime;

use super::PlayerSlot;

/// What [`Runtime::engage`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Engagement {
    /// A new opponent joined the queue.
    Started(OpponentKey),
    /// The opponent was already engaged and is now the current target.
    Retargeted(OpponentKey),
}

impl Engagement {
    pub fn key(&self) -> &OpponentKey {
        match self {
            Engagement::Started(key) | Engagement::Retargeted(key) => key,
        }
    }
}

/// Builds an engagement entry, fixing the difficulty ratio at this moment.
pub(crate) fn admit(
    env: &Env<'_>,
    config: &CombatConfig,
    player: &Character,
    key: OpponentKey,
    template: &NpcTemplate,
    health: u32,
    intent: Intent,
) -> EngagementEntry {
    let coefficients = &config.coefficients;
    let mut entry = EngagementEntry::new(key, template, health, intent, 1.0);
    let theirs = combat_power(
        &derive_stats(&entry.snapshot, env, coefficients),
        entry.current_health,
    );
    let ours = combat_power(
        &derive_stats(player, env, coefficients),
        player.resources.health,
    );
    entry.difficulty_ratio = difficulty_ratio(theirs, ours);
    entry
}

impl Runtime {
    /// Engages an opponent in the player's room, or makes an already engaged
    /// one the current target.
    ///
    /// Without an explicit index the first instance that is either engaged
    /// already or free to fight is chosen. Instances still waiting to respawn
    /// and unconscious ones are skipped.
    pub async fn engage(
        &self,
        player: &EntityId,
        opponent: &OpponentRef,
        lethal: bool,
    ) -> Result<Engagement> {
        let slot = self.slot(player).await?;
        let mut slot = slot.lock().await;
        let now = self.now();

        let room_id = slot.character.location.clone();
        let room = self
            .oracles()
            .rooms()
            .get(&room_id)
            .ok_or_else(|| RuntimeError::UnknownRoom(room_id.clone()))?;
        if room.safe {
            debug!(target: "runtime::engage", player = %player, room = %room_id, "refused in safe room");
            return Err(RuntimeError::UnsafeZoneViolation { room: room_id });
        }
        if slot.character.is_unconscious() {
            return Err(PerformRejection::Unconscious.into());
        }

        let missing = || {
            RuntimeError::NoSuchTarget(match opponent.index {
                Some(index) => format!("{}#{}", opponent.template, index),
                None => opponent.template.to_string(),
            })
        };
        let template = self.oracles().npcs().get(&opponent.template).ok_or_else(missing)?;
        let count = room.count_of(&opponent.template);
        let indices: Vec<u32> = match opponent.index {
            Some(index) => (index < count).then_some(index).into_iter().collect(),
            None => (0..count).collect(),
        };

        for index in indices {
            let key = OpponentKey::new(room_id.clone(), opponent.template.clone(), index);

            if slot.session.contains(&key) {
                slot.session.promote(&key);
                self.enter_combat(&mut slot);
                debug!(target: "runtime::engage", player = %player, opponent = %key, "retargeted");
                self.notifier().narrate(
                    &room_id,
                    player,
                    Narration::Retargeted { head: key.clone() },
                );
                return Ok(Engagement::Retargeted(key));
            }

            let Some(health) = self.available_health(&key, template.max_health, now).await else {
                continue;
            };
            let entry = admit(
                &self.oracles().as_env(),
                self.combat_config(),
                &slot.character,
                key.clone(),
                template,
                health,
                Intent::from_lethal(lethal),
            );
            self.start_engagement(&mut slot, entry, player.clone(), now).await;
            return Ok(Engagement::Started(key));
        }

        Err(missing())
    }

    /// Every aggressive opponent in the player's room that is free to fight
    /// attacks with lethal intent. Safe rooms never trigger.
    pub async fn check_aggro(&self, player: &EntityId) -> Result<Vec<OpponentKey>> {
        let slot = self.slot(player).await?;
        let mut slot = slot.lock().await;
        self.aggro(&mut slot).await
    }

    pub(crate) async fn aggro(&self, slot: &mut PlayerSlot) -> Result<Vec<OpponentKey>> {
        let now = self.now();
        let room_id = slot.character.location.clone();
        let room = self
            .oracles()
            .rooms()
            .get(&room_id)
            .ok_or_else(|| RuntimeError::UnknownRoom(room_id.clone()))?;
        if room.safe || slot.character.state == CharacterState::Dead {
            return Ok(Vec::new());
        }

        let mut engaged = Vec::new();
        for key in room.instances(&room_id) {
            let Some(template) = self.oracles().npcs().get(&key.template) else {
                continue;
            };
            if !template.aggressive || slot.session.contains(&key) {
                continue;
            }
            let Some(health) = self.available_health(&key, template.max_health, now).await else {
                continue;
            };
            let entry = admit(
                &self.oracles().as_env(),
                self.combat_config(),
                &slot.character,
                key.clone(),
                template,
                health,
                Intent::Lethal,
            );
            self.start_engagement(slot, entry, key.entity_id(), now).await;
            engaged.push(key);
        }

        if !engaged.is_empty() {
            info!(
                target: "runtime::engage",
                player = %slot.character.id,
                room = %room_id,
                count = engaged.len(),
                "aggressive opponents attack"
            );
        }
        Ok(engaged)
    }

    /// Stops fighting: clears the queue, cancels the ticker and wakes an
    /// unconscious player with 1 health.
    pub async fn disengage(&self, player: &EntityId) -> Result<()> {
        let slot = self.slot(player).await?;
        let mut slot = slot.lock().await;
        let in_combat = !slot.session.is_empty()
            || slot.is_ticking()
            || matches!(
                slot.character.state,
                CharacterState::Fighting | CharacterState::Unconscious
            );
        if !in_combat {
            return Ok(());
        }
        self.leave_combat(&mut slot, DisengageReason::Requested);
        self.save_character(&slot.character).await;
        Ok(())
    }

    pub(crate) fn leave_combat(&self, slot: &mut PlayerSlot, reason: DisengageReason) {
        let room = slot.character.location.clone();
        slot.session.clear();
        let woke = lifecycle::end_combat(&mut slot.character);
        self.finish_engagement(slot, &room, reason, woke);
    }

    async fn start_engagement(
        &self,
        slot: &mut PlayerSlot,
        entry: EngagementEntry,
        origin: EntityId,
        now: i64,
    ) {
        info!(
            target: "runtime::engage",
            player = %slot.character.id,
            opponent = %entry.key,
            intent = ?entry.intent,
            health = entry.current_health,
            ratio = entry.difficulty_ratio,
            "engagement started"
        );
        self.touch_opponent(&entry, now).await;
        self.notifier().narrate(
            entry.room(),
            &origin,
            Narration::EngagementStarted {
                opponent: entry.key.clone(),
                name: entry.display_name.clone(),
                intent: entry.intent,
            },
        );
        slot.session.push(entry);
        self.enter_combat(slot);
    }

    fn enter_combat(&self, slot: &mut PlayerSlot) {
        if slot.character.state == CharacterState::Normal {
            slot.character.state = CharacterState::Fighting;
        }
        self.ensure_ticker(slot);
    }

    /// Health the instance enters the fight with, or `None` when it cannot be
    /// fought yet. Store read failures fall back to template defaults.
    async fn available_health(&self, key: &OpponentKey, max_health: u32, now: i64) -> Option<u32> {
        let store = self.store();

        match store.respawn_at(key).await {
            Ok(Some(ready_at)) if ready_at > now => return None,
            Ok(Some(_)) => {
                debug!(target: "runtime::engage", opponent = %key, "respawned");
                let key = key.clone();
                self.write("clear_respawn", move |store| async move {
                    store.clear_respawn(&key).await
                })
                .await;
            }
            Ok(None) => {}
            Err(error) => {
                warn!(target: "runtime::store", opponent = %key, %error, "respawn lookup failed");
            }
        }

        match store.opponent(key).await {
            Ok(Some(record)) if record.is_stale(now, self.combat_config().record_stale_ms) => {
                debug!(target: "runtime::engage", opponent = %key, "stale record reset");
                let key = key.clone();
                self.write("clear_opponent", move |store| async move {
                    store.clear_opponent(&key).await
                })
                .await;
                Some(max_health)
            }
            Ok(Some(record)) if !record.is_live() => None,
            Ok(Some(record)) => Some(record.health.min(max_health)),
            Ok(None) => Some(max_health),
            Err(error) => {
                warn!(target: "runtime::store", opponent = %key, %error, "opponent lookup failed");
                Some(max_health)
            }
        }
    }
}
