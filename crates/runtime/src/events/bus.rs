//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use wulin_core::{EntityId, RoomId};

use super::types::{Narration, ProgressEvent, RoomEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Narration addressed to the occupants of a room
    Room,
    /// Potential, kills and death penalties
    Progress,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Room(RoomEvent),
    Progress(ProgressEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Room(_) => Topic::Room,
            Event::Progress(_) => Topic::Progress,
        }
    }
}

/// Outbound notification seam used by the combat operations.
///
/// Delivery is best-effort: a notifier must never block or fail the caller.
pub trait Notifier: Send + Sync {
    fn narrate(&self, room: &RoomId, origin: &EntityId, narration: Narration);

    fn progress(&self, event: ProgressEvent);
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about.
#[derive(Clone)]
pub struct EventBus {
    room: broadcast::Sender<Event>,
    progress: broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            room: broadcast::channel(capacity).0,
            progress: broadcast::channel(capacity).0,
        }
    }

    fn channel(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Room => &self.room,
            Topic::Progress => &self.progress,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.channel(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channel(topic).subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for EventBus {
    fn narrate(&self, room: &RoomId, origin: &EntityId, narration: Narration) {
        self.publish(Event::Room(RoomEvent {
            room: room.clone(),
            origin: origin.clone(),
            narration,
        }));
    }

    fn progress(&self, event: ProgressEvent) {
        self.publish(Event::Progress(event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_only_see_their_topic() {
        let bus = EventBus::with_capacity(8);
        let mut rooms = bus.subscribe(Topic::Room);
        let mut progress = bus.subscribe(Topic::Progress);

        bus.narrate(&RoomId::new("pass"), &EntityId::new("p1"), Narration::Woke);
        bus.progress(ProgressEvent::KillRecorded {
            player: EntityId::new("p1"),
            kills: 1,
        });

        let Event::Room(event) = rooms.recv().await.unwrap() else {
            panic!("expected a room event");
        };
        assert_eq!(event.room.as_str(), "pass");
        assert_eq!(event.origin.as_str(), "p1");
        assert_eq!(event.narration, Narration::Woke);
        assert!(rooms.try_recv().is_err());

        assert_eq!(progress.recv().await.unwrap().topic(), Topic::Progress);
    }

    #[test]
    fn publishing_without_subscribers_is_harmless() {
        let bus = EventBus::new();
        bus.progress(ProgressEvent::KillRecorded {
            player: EntityId::new("p1"),
            kills: 3,
        });
    }
}
