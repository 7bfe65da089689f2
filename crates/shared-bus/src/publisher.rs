//! # Change Publisher
//!
//! Defines the publishing side of the change bus.

use crate::events::{ChangeEvent, ChangeFilter};
use crate::subscriber::{ChangeStream, Subscription};
use crate::DEFAULT_CHANNEL_CAPACITY;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Trait for publishing change events to the bus.
///
/// Both persistence adapters publish through this interface after every
/// successful mutation.
pub trait ChangePublisher: Send + Sync {
    /// Publish a change event.
    ///
    /// # Returns
    ///
    /// The number of active subscribers that received the event.
    fn publish(&self, event: ChangeEvent) -> usize;

    /// Get the total number of events published.
    fn events_published(&self) -> u64;
}

/// In-memory implementation of the change bus.
///
/// Uses `tokio::sync::broadcast` for multi-producer, multi-consumer
/// semantics. Suitable for single-process operation; the local-mirror
/// adapter layers cross-process observation on top by republishing changes
/// it reads back from the shared store.
pub struct InMemoryChangeBus {
    /// Broadcast sender for events.
    sender: broadcast::Sender<ChangeEvent>,

    /// Active subscription count by filter key.
    subscriptions: Arc<RwLock<HashMap<String, usize>>>,

    /// Total events published.
    events_published: AtomicU64,

    /// Channel capacity.
    capacity: usize,
}

impl InMemoryChangeBus {
    /// Create a new change bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a new change bus with specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            subscriptions: Arc::new(RwLock::new(HashMap::new())),
            events_published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Subscribe to events matching a filter.
    ///
    /// Returns a `Subscription` handle that can be used to receive events.
    #[must_use]
    pub fn subscribe(&self, filter: ChangeFilter) -> Subscription {
        let receiver = self.sender.subscribe();
        let filter_key = filter.key();

        // Track subscription
        {
            if let Ok(mut subs) = self.subscriptions.write() {
                *subs.entry(filter_key.clone()).or_insert(0) += 1;
            }
        }

        debug!(filter = %filter_key, "New subscription created");

        Subscription::new(receiver, filter, self.subscriptions.clone(), filter_key)
    }

    /// Get a stream of events matching a filter.
    ///
    /// This is a convenience method that returns a `ChangeStream`.
    #[must_use]
    pub fn change_stream(&self, filter: ChangeFilter) -> ChangeStream {
        ChangeStream::new(self.subscribe(filter))
    }

    /// Get the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Get the channel capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryChangeBus {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangePublisher for InMemoryChangeBus {
    fn publish(&self, event: ChangeEvent) -> usize {
        let key = format!("{}/{}", event.collection, event.entity_id);

        // Always increment counter (event was attempted)
        self.events_published.fetch_add(1, Ordering::Relaxed);

        match self.sender.send(event) {
            Ok(receiver_count) => {
                debug!(entity = %key, receivers = receiver_count, "Change published");
                receiver_count
            }
            Err(e) => {
                // No receivers - event is dropped
                warn!(entity = %key, error = %e, "Change dropped (no receivers)");
                0
            }
        }
    }

    fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ChangeOrigin;
    use shared_types::Collection;

    fn event(id: &str) -> ChangeEvent {
        ChangeEvent {
            collection: Collection::Users,
            entity_id: id.to_string(),
            snapshot: None,
            rev: 1,
            origin: ChangeOrigin::Local,
        }
    }

    #[tokio::test]
    async fn test_publish_no_subscribers() {
        let bus = InMemoryChangeBus::new();

        let receivers = bus.publish(event("USR-1"));
        assert_eq!(receivers, 0);
        assert_eq!(bus.events_published(), 1);
    }

    #[tokio::test]
    async fn test_publish_with_subscriber() {
        let bus = InMemoryChangeBus::new();

        // Create subscriber BEFORE publishing
        let _sub = bus.subscribe(ChangeFilter::entity(Collection::Users, "USR-1"));

        let receivers = bus.publish(event("USR-1"));
        assert_eq!(receivers, 1);
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn test_multiple_subscribers() {
        let bus = InMemoryChangeBus::new();

        let _sub1 = bus.subscribe(ChangeFilter::entity(Collection::Users, "USR-1"));
        let _sub2 = bus.subscribe(ChangeFilter::entity(Collection::Users, "USR-2"));
        let _sub3 = bus.subscribe(ChangeFilter::collection(Collection::Users));

        let receivers = bus.publish(event("USR-1"));

        // All three hold live receivers; filtering happens on the consumer side.
        assert_eq!(receivers, 3);
        assert_eq!(bus.subscriber_count(), 3);
    }

    #[tokio::test]
    async fn test_custom_capacity() {
        let bus = InMemoryChangeBus::with_capacity(100);
        assert_eq!(bus.capacity(), 100);
    }

    #[test]
    fn test_default_bus() {
        let bus = InMemoryChangeBus::default();
        assert_eq!(bus.capacity(), DEFAULT_CHANNEL_CAPACITY);
        assert_eq!(bus.subscriber_count(), 0);
        assert_eq!(bus.events_published(), 0);
    }
}
