//! Technique ("perform") command path.

use tracing::{debug, info, warn};
use wulin_core::{
    Dice, EngagementEntry, EntityId, Intent, OpponentKey, PerformReport, RoundContext, TechniqueId,
    TechniqueKind, check_technique, commit_technique, execute_technique, select_target,
};

use crate::api::{Result, RuntimeError};
use crate::events::{DisengageReason, Narration};
use crate::runtime::Runtime;

use super::PlayerSlot;
use super::engagement::admit;

impl Runtime {
    /// Uses a technique against the current target, an explicitly named
    /// engaged opponent, or (area techniques) everyone fighting in the room.
    ///
    /// Every precondition is checked and the target resolved before the
    /// force cost and both cooldowns are taken.
    pub async fn perform_technique(
        &self,
        player: &EntityId,
        technique: &TechniqueId,
        target: Option<&OpponentKey>,
    ) -> Result<PerformReport> {
        let handle = self.slot(player).await?;
        let mut guard = handle.lock().await;
        let slot = &mut *guard;
        let now = self.now();

        let definition = check_technique(
            &slot.character,
            &slot.session,
            technique,
            &self.oracles().as_env(),
            now,
        )
        .inspect_err(|rejection| {
            debug!(
                target: "runtime::perform",
                player = %player,
                technique = %technique,
                %rejection,
                "rejected"
            );
        })?;

        let chosen = select_target(&slot.session, target);
        if target.is_some() && chosen.is_none() {
            return Err(RuntimeError::NoSuchTarget(
                target.map(ToString::to_string).unwrap_or_default(),
            ));
        }
        let chosen = match definition.kind {
            TechniqueKind::Aoe => None,
            _ => Some(chosen.ok_or_else(|| RuntimeError::NoSuchTarget(technique.to_string()))?),
        };
        let bystanders = match definition.kind {
            TechniqueKind::Aoe => self.bystanders(slot, now).await,
            _ => Vec::new(),
        };

        let room = slot.character.location.clone();
        let nonce = slot.next_nonce();
        let report = {
            let env = self.oracles().as_env();
            let ctx = RoundContext::new(env, self.combat_config(), now);
            let mut dice = Dice::new(env.rng(), self.seed(), nonce);
            let spent = commit_technique(
                &mut slot.character,
                technique,
                &definition,
                self.combat_config().global_cooldown_ms,
                now,
            );
            info!(
                target: "runtime::perform",
                player = %player,
                technique = %technique,
                opponent = ?chosen,
                bystanders = bystanders.len(),
                force_spent = spent,
                "technique committed"
            );
            execute_technique(
                &ctx,
                &mut slot.character,
                &mut slot.session,
                technique,
                &definition,
                chosen.as_ref(),
                bystanders,
                &mut dice,
            )
        };

        self.notifier().narrate(
            &room,
            player,
            Narration::TechniqueUsed {
                technique: technique.clone(),
                name: definition.name.clone(),
            },
        );
        self.publish_events(slot, &room, &report.events, now).await;
        self.persist_health(&room, &report.health_updates, now).await;

        for key in &report.engaged {
            if let Some(entry) = slot.session.get(key) {
                self.touch_opponent(entry, now).await;
            }
        }

        if report.session_empty {
            self.finish_engagement(slot, &room, DisengageReason::SessionEmpty, false);
        } else {
            self.ensure_ticker(slot);
        }

        self.save_character(&slot.character).await;
        Ok(report)
    }

    /// Live opponents in the player's room that other fights have already
    /// touched, ready to be pulled in with lethal intent.
    async fn bystanders(&self, slot: &PlayerSlot, now: i64) -> Vec<EngagementEntry> {
        let room = &slot.character.location;
        let records = match self.store().opponents_in(room).await {
            Ok(records) => records,
            Err(error) => {
                warn!(target: "runtime::store", room = %room, %error, "room scan failed");
                return Vec::new();
            }
        };

        let stale_ms = self.combat_config().record_stale_ms;
        let env = self.oracles().as_env();
        records
            .into_iter()
            .filter(|(key, record)| {
                !slot.session.contains(key) && record.is_live() && !record.is_stale(now, stale_ms)
            })
            .filter_map(|(key, record)| {
                let template = self.oracles().npcs().get(&key.template)?;
                let health = record.health.min(template.max_health);
                Some(admit(
                    &env,
                    self.combat_config(),
                    &slot.character,
                    key,
                    template,
                    health,
                    Intent::Lethal,
                ))
            })
            .collect()
    }
}
