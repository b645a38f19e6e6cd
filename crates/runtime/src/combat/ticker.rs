//! Recurring round scheduler, one per engaged player.

use std::sync::Weak;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::debug;
use wulin_core::EntityId;

use crate::runtime::{Runtime, RuntimeInner};

/// Handle to a spawned ticker task.
///
/// Cancelling (or dropping) the handle raises the stop flag. The task checks
/// the flag before every round and again once it holds the player's slot,
/// so a round can never start after the flag was raised under that lock.
pub(crate) struct Ticker {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl Ticker {
    pub(crate) fn spawn(runtime: Weak<RuntimeInner>, player: EntityId, period: Duration) -> Self {
        let (stop, stopped) = watch::channel(false);
        let task = tokio::spawn(run(runtime, player, period, stopped));
        Self { stop, task }
    }

    pub(crate) fn is_running(&self) -> bool {
        !*self.stop.borrow() && !self.task.is_finished()
    }

    pub(crate) fn cancel(self) {
        self.stop.send_replace(true);
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop.send_replace(true);
    }
}

async fn run(
    runtime: Weak<RuntimeInner>,
    player: EntityId,
    period: Duration,
    mut stopped: watch::Receiver<bool>,
) {
    let mut interval = time::interval_at(time::Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = stopped.changed() => {}
        }
        if *stopped.borrow() {
            break;
        }
        let Some(inner) = runtime.upgrade() else {
            break;
        };
        if !Runtime::from_inner(inner)
            .scheduled_round(&player, &stopped)
            .await
        {
            break;
        }
    }

    debug!(target: "runtime::tick", player = %player, "ticker stopped");
}
