//! Fixed-cadence combat rounds.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::debug;
use wulin_core::{Dice, EntityId, RoundContext, RoundEnd, RoundReport, resolve_round};

use crate::api::Result;
use crate::events::DisengageReason;
use crate::runtime::Runtime;

use super::PlayerSlot;
use super::ticker::Ticker;

impl Runtime {
    /// Resolves one round for `player` right now.
    ///
    /// The ticker calls this path on its own; hosts running with
    /// `auto_tick` off call it directly.
    pub async fn advance_tick(&self, player: &EntityId) -> Result<RoundReport> {
        let slot = self.slot(player).await?;
        let mut slot = slot.lock().await;
        Ok(self.run_round(&mut slot).await)
    }

    /// One ticker-driven round. Returns whether the ticker should keep going.
    pub(crate) async fn scheduled_round(
        &self,
        player: &EntityId,
        stopped: &watch::Receiver<bool>,
    ) -> bool {
        let Ok(slot) = self.slot(player).await else {
            return false;
        };
        let mut slot = slot.lock().await;
        if *stopped.borrow() {
            return false;
        }
        self.run_round(&mut slot).await.end.is_none()
    }

    pub(crate) async fn run_round(&self, slot: &mut PlayerSlot) -> RoundReport {
        let now = self.now();
        let nonce = slot.next_nonce();
        let room = slot.character.location.clone();
        let was_unconscious = slot.character.is_unconscious();
        let was_engaged = !slot.session.is_empty() || slot.is_ticking();

        let report = {
            let env = self.oracles().as_env();
            let ctx = RoundContext::new(env, self.combat_config(), now);
            let mut dice = Dice::new(env.rng(), self.seed(), nonce);
            resolve_round(&ctx, &mut slot.character, &mut slot.session, &mut dice)
        };

        debug!(
            target: "runtime::tick",
            player = %slot.character.id,
            nonce,
            events = report.events.len(),
            health = slot.character.resources.health,
            end = ?report.end,
            "round resolved"
        );

        self.publish_events(slot, &room, &report.events, now).await;
        self.persist_health(&room, &report.health_updates, now).await;

        match report.end {
            Some(RoundEnd::SessionEmpty) if !was_engaged => slot.stop_ticker(),
            Some(RoundEnd::SessionEmpty) => {
                let woke = was_unconscious && !slot.character.is_unconscious();
                self.finish_engagement(slot, &room, DisengageReason::SessionEmpty, woke);
            }
            Some(RoundEnd::LeftRoom) => {
                let woke = was_unconscious && !slot.character.is_unconscious();
                self.finish_engagement(slot, &room, DisengageReason::LeftRoom, woke);
            }
            Some(RoundEnd::Ejected | RoundEnd::Died) => slot.stop_ticker(),
            None => {}
        }

        self.save_character(&slot.character).await;
        report
    }

    /// Starts the player's ticker unless one is already running.
    pub(crate) fn ensure_ticker(&self, slot: &mut PlayerSlot) {
        if !self.inner.config.auto_tick || slot.is_ticking() {
            return;
        }
        let period = Duration::from_millis(self.combat_config().tick_interval_ms);
        debug!(
            target: "runtime::tick",
            player = %slot.character.id,
            period_ms = self.combat_config().tick_interval_ms,
            "ticker started"
        );
        slot.ticker = Some(Ticker::spawn(
            Arc::downgrade(&self.inner),
            slot.character.id.clone(),
            period,
        ));
    }
}
