//! Movement hooks and the return from limbo.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use wulin_core::{EntityId, OpponentKey, RoomId, lifecycle};

use crate::api::{Result, RuntimeError};
use crate::events::{DisengageReason, Narration, ProgressEvent};
use crate::runtime::Runtime;

use super::PlayerSlot;

impl Runtime {
    /// Moves the player, as the movement layer does after a successful walk.
    ///
    /// Leaving the room ends any engagement, leaving limbo clears the dead
    /// state, and aggressive opponents at the destination attack. Returns
    /// the opponents that did.
    pub async fn relocate_player(&self, player: &EntityId, room: &RoomId) -> Result<Vec<OpponentKey>> {
        if self.oracles().rooms().get(room).is_none() {
            return Err(RuntimeError::UnknownRoom(room.clone()));
        }
        let slot = self.slot(player).await?;
        let mut slot = slot.lock().await;
        self.arrive(&mut slot, room.clone()).await
    }

    /// Sends a dead player from limbo back to their respawn point. Does
    /// nothing (and returns `None`) once they have left limbo on their own.
    pub async fn return_from_limbo(&self, player: &EntityId) -> Result<Option<RoomId>> {
        self.leave_limbo(player, None).await
    }

    async fn leave_limbo(&self, player: &EntityId, due: Option<i64>) -> Result<Option<RoomId>> {
        let slot = self.slot(player).await?;
        let mut slot = slot.lock().await;
        let destination = lifecycle::return_from_limbo(&slot.character, self.combat_config(), due);
        let Some(destination) = destination else {
            return Ok(None);
        };
        self.arrive(&mut slot, destination.clone()).await?;
        info!(target: "runtime::lifecycle", player = %player, room = %destination, "returned from limbo");
        self.notifier().progress(ProgressEvent::ReturnedFromLimbo {
            player: player.clone(),
            room: destination.clone(),
        });
        Ok(Some(destination))
    }

    async fn arrive(&self, slot: &mut PlayerSlot, room: RoomId) -> Result<Vec<OpponentKey>> {
        if slot.character.location != room {
            if !slot.session.is_empty() || slot.is_ticking() {
                self.leave_combat(slot, DisengageReason::LeftRoom);
            }
            lifecycle::arrive(&mut slot.character, room.clone(), self.combat_config());
            self.notifier()
                .narrate(&room, &slot.character.id, Narration::Arrived);
        }
        let engaged = self.aggro(slot).await;
        self.save_character(&slot.character).await;
        engaged
    }

    /// Returns the player from limbo at `return_at`, unless they left limbo
    /// or died again in the meantime.
    pub(crate) fn schedule_limbo_return(&self, player: EntityId, return_at: i64, now: i64) {
        let runtime = Arc::downgrade(&self.inner);
        let delay = Duration::from_millis(u64::try_from(return_at - now).unwrap_or(0));
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(inner) = runtime.upgrade() else {
                return;
            };
            match Runtime::from_inner(inner).leave_limbo(&player, Some(return_at)).await {
                Ok(Some(_)) => {}
                Ok(None) => {
                    debug!(target: "runtime::lifecycle", player = %player, return_at, "limbo return no longer due");
                }
                Err(error) => {
                    warn!(target: "runtime::lifecycle", player = %player, %error, "limbo return failed");
                }
            }
        });
    }
}
