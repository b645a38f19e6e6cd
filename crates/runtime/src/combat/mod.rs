//! Combat operations exposed on [`Runtime`](crate::Runtime).
//!
//! Each operation locks one player slot, samples the clock, runs the pure
//! rules from `wulin-core` and then narrates and persists what they report.
//!
//! - [`engagement`]: `engage`, `check_aggro`, `disengage`
//! - [`tick`]: `advance_tick` and the recurring [`ticker`]
//! - [`perform`]: `perform_technique`
//! - [`lifecycle`]: `relocate_player`, `return_from_limbo`
mod engagement;
mod lifecycle;
mod perform;
mod report;
mod tick;
mod ticker;

pub use engagement::Engagement;

use wulin_core::{Character, CombatSession};

use self::ticker::Ticker;

/// Everything the runtime owns for one player.
pub(crate) struct PlayerSlot {
    pub(crate) character: Character,
    pub(crate) session: CombatSession,
    pub(crate) ticker: Option<Ticker>,
    /// Bumped once per resolved round or technique; feeds the dice.
    pub(crate) nonce: u64,
}

impl PlayerSlot {
    pub(crate) fn new(character: Character) -> Self {
        Self {
            character,
            session: CombatSession::new(),
            ticker: None,
            nonce: 0,
        }
    }

    pub(crate) fn next_nonce(&mut self) -> u64 {
        self.nonce = self.nonce.wrapping_add(1);
        self.nonce
    }

    pub(crate) fn is_ticking(&self) -> bool {
        self.ticker.as_ref().is_some_and(Ticker::is_running)
    }

    /// Signals the ticker to stop; no round runs after this returns.
    pub(crate) fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }
}
