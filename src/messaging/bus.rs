use crossbeam_channel::{unbounded, Receiver, Sender, TrySendError};
use parking_lot::{Mutex, RwLock};
/// Event bus for pub/sub messaging
///
/// Presentation surfaces and the cue dispatcher subscribe here; the match
/// engine is the only publisher.
use std::sync::Arc;

use super::events::Event;

/// Subscriber ID for tracking subscriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(usize);

/// Event subscriber
struct Subscriber {
    id: SubscriberId,
    sender: Sender<Event>,
}

/// Observer registry broadcasting events to every subscriber
///
/// Clones share the same registry.
#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Arc<RwLock<Vec<Subscriber>>>,
    next_id: Arc<Mutex<usize>>,
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to events, returns a receiver and subscription ID
    pub fn subscribe(&self) -> (Receiver<Event>, SubscriberId) {
        let (tx, rx) = unbounded();

        let id = {
            let mut next_id = self.next_id.lock();
            let id = SubscriberId(*next_id);
            *next_id += 1;
            id
        };

        self.subscribers.write().push(Subscriber { id, sender: tx });
        tracing::debug!("Subscriber {:?} registered", id);

        (rx, id)
    }

    /// Unsubscribe from events
    pub fn unsubscribe(&self, id: SubscriberId) {
        self.subscribers.write().retain(|s| s.id != id);
    }

    /// Publish an event to all subscribers
    ///
    /// Never blocks. Subscribers whose receiver was dropped are removed.
    pub fn publish(&self, event: Event) {
        let mut disconnected = Vec::new();

        for subscriber in self.subscribers.read().iter() {
            if let Err(TrySendError::Disconnected(_)) = subscriber.sender.try_send(event.clone()) {
                disconnected.push(subscriber.id);
            }
        }

        if !disconnected.is_empty() {
            tracing::debug!("Dropping {} disconnected subscriber(s)", disconnected.len());
            self.subscribers
                .write()
                .retain(|s| !disconnected.contains(&s.id));
        }
    }

    /// Get number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }

    /// Clear all subscribers
    pub fn clear(&self) {
        self.subscribers.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::CueKind;

    #[test]
    fn test_event_bus_subscribe() {
        let bus = EventBus::new();
        let (_rx, _id) = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[test]
    fn test_event_bus_unsubscribe() {
        let bus = EventBus::new();
        let (_rx, id) = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        bus.unsubscribe(id);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_event_bus_publish() {
        let bus = EventBus::new();
        let (rx, _id) = bus.subscribe();

        bus.publish(Event::Cue {
            kind: CueKind::NearEnd,
        });

        match rx.try_recv().unwrap() {
            Event::Cue {
                kind: CueKind::NearEnd,
            } => {}
            other => panic!("Wrong event type received: {:?}", other),
        }
    }

    #[test]
    fn test_event_bus_multiple_subscribers() {
        let bus = EventBus::new();
        let (rx1, _id1) = bus.subscribe();
        let (rx2, _id2) = bus.subscribe();

        assert_eq!(bus.subscriber_count(), 2);

        bus.publish(Event::Shutdown);

        assert_eq!(rx1.try_recv(), Ok(Event::Shutdown));
        assert_eq!(rx2.try_recv(), Ok(Event::Shutdown));
    }

    #[test]
    fn test_dropped_receiver_is_pruned() {
        let bus = EventBus::new();
        let (rx1, _id1) = bus.subscribe();
        let (rx2, _id2) = bus.subscribe();
        drop(rx2);

        bus.publish(Event::Shutdown);

        assert_eq!(bus.subscriber_count(), 1);
        assert!(rx1.try_recv().is_ok());
    }

    #[test]
    fn test_event_bus_clear() {
        let bus = EventBus::new();
        let (_rx1, _id1) = bus.subscribe();
        let (_rx2, _id2) = bus.subscribe();

        bus.clear();
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_event_bus_clone() {
        let bus1 = EventBus::new();
        let bus2 = bus1.clone();

        let (_rx, _id) = bus1.subscribe();
        assert_eq!(bus1.subscriber_count(), 1);
        assert_eq!(bus2.subscriber_count(), 1); // Shared state
    }
}
