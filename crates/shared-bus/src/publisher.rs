//! # Event Publisher
//!
//! The node's bus: one `broadcast` channel shared by the vault and the
//! flow router, with per-topic publish counters.

use crate::events::{EventFilter, EventTopic, LedgerEvent};
use crate::subscriber::Subscription;
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use tracing::{debug, trace};

/// Publishing side of a node's bus.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Deliver `event` to every current subscriber.
    ///
    /// Returns how many subscribers it reached; zero is normal for a node
    /// nobody is watching.
    async fn publish(&self, event: LedgerEvent) -> usize;
}

#[derive(Debug, Default)]
struct TopicCounters {
    vault: AtomicU64,
    flows: AtomicU64,
}

impl TopicCounters {
    fn slot(&self, topic: EventTopic) -> Option<&AtomicU64> {
        match topic {
            EventTopic::Vault => Some(&self.vault),
            EventTopic::Flows => Some(&self.flows),
            EventTopic::All => None,
        }
    }
}

/// In-process bus owned by a node's runtime context.
pub struct InMemoryEventBus {
    sender: broadcast::Sender<LedgerEvent>,
    capacity: usize,
    published: TopicCounters,
}

impl InMemoryEventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Bus whose subscribers may fall `capacity` events behind before the
    /// oldest are skipped.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            capacity,
            published: TopicCounters::default(),
        }
    }

    /// Events matching `filter`, starting with the next one published.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        debug!(topics = ?filter.topics, flows = filter.flows.len(), "Subscribed");
        Subscription::new(self.sender.subscribe(), filter)
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Events published on `topic` so far; `All` sums every topic.
    #[must_use]
    pub fn published(&self, topic: EventTopic) -> u64 {
        match self.published.slot(topic) {
            Some(counter) => counter.load(Ordering::Relaxed),
            None => self.published(EventTopic::Vault) + self.published(EventTopic::Flows),
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for InMemoryEventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryEventBus")
            .field("capacity", &self.capacity)
            .field("subscribers", &self.subscriber_count())
            .field("vault_updates", &self.published(EventTopic::Vault))
            .field("flow_events", &self.published(EventTopic::Flows))
            .finish()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: LedgerEvent) -> usize {
        let topic = event.topic();
        if let Some(counter) = self.published.slot(topic) {
            counter.fetch_add(1, Ordering::Relaxed);
        }
        // An error only means there are no receivers right now.
        let reached = self.sender.send(event).unwrap_or(0);
        trace!(?topic, reached, "Event published");
        reached
    }
}
