//! # Shared Bus - Per-Node Event Bus
//!
//! Every node owns one bus, created when the node starts and dropped when it
//! shuts down. The vault publishes a [`LedgerEvent::VaultUpdated`] for each
//! committed transaction and the flow router publishes lifecycle events for
//! every flow instance it runs.
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │    Vault     │                    │   Observer   │
//! │  FlowRouter  │    publish()       │   (tests,    │
//! │              │ ──────┐            │    RPC, ..)  │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Event Bus   │          │
//!                  │              │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```
//!
//! ## Delivery
//!
//! - Subscribers only see events published after they subscribed.
//! - A single subscriber receives events in publish order.
//! - A subscriber that falls more than the channel capacity behind skips
//!   the oldest events and keeps count of how many it lost.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{EventFilter, EventTopic, FlowOutcome, LedgerEvent};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before the oldest are dropped.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
