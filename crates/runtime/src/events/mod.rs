//! Topic-based event bus for runtime events.
//!
//! Room narration and progression changes are published to separate topics,
//! and consumers subscribe only to the topics they need. The combat
//! operations talk to a [`Notifier`]; [`EventBus`] is the default one.

mod bus;
mod types;

pub use bus::{Event, EventBus, Notifier, Topic};
pub use types::{DisengageReason, Narration, ProgressEvent, RoomEvent};
