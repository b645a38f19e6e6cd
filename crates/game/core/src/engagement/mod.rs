//! Per-player engagement state.
//!
//! A [`CombatSession`] is the ordered queue of [`EngagementEntry`] values a
//! player is fighting. The head is the current target; every entry attacks
//! the player regardless of position.
mod entry;
mod session;

pub use entry::{EngagementEntry, Intent, OpponentRef};
pub use session::CombatSession;
