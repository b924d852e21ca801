//! # Ledger Events
//!
//! Defines all event types that flow through a node's bus.

use serde::{Deserialize, Serialize};
use shared_types::{FlowId, FlowRole, ProtocolId, VaultUpdate};

/// All events that can be published to the event bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LedgerEvent {
    // =========================================================================
    // VAULT
    // =========================================================================
    /// A transaction was committed to the local vault.
    ///
    /// Published after the store mutation, never for an empty delta.
    VaultUpdated(VaultUpdate),

    // =========================================================================
    // FLOWS
    // =========================================================================
    /// The router started a flow instance.
    FlowStarted {
        /// Instance identifier.
        flow_id: FlowId,
        /// Protocol the instance runs.
        protocol: ProtocolId,
        /// Side of the session.
        role: FlowRole,
    },

    /// A flow instance reached a terminal state.
    FlowFinished {
        /// Instance identifier.
        flow_id: FlowId,
        /// Protocol the instance ran.
        protocol: ProtocolId,
        /// Side of the session.
        role: FlowRole,
        /// How it ended.
        outcome: FlowOutcome,
    },
}

/// Terminal outcome of a flow instance as reported on the bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowOutcome {
    /// Reached `Completed`.
    Completed,
    /// Reached `Failed`.
    Failed {
        /// Rendered error.
        reason: String,
    },
}

impl LedgerEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::VaultUpdated(_) => EventTopic::Vault,
            Self::FlowStarted { .. } | Self::FlowFinished { .. } => EventTopic::Flows,
        }
    }

    /// Flow the event concerns, if any.
    #[must_use]
    pub fn flow_id(&self) -> Option<FlowId> {
        match self {
            Self::VaultUpdated(_) => None,
            Self::FlowStarted { flow_id, .. } | Self::FlowFinished { flow_id, .. } => {
                Some(*flow_id)
            }
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Vault commits.
    Vault,
    /// Flow lifecycle.
    Flows,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Flows to include. Empty means events of any (or no) flow.
    pub flows: Vec<FlowId>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            flows: Vec::new(),
        }
    }

    /// Create a filter for lifecycle events of specific flows.
    #[must_use]
    pub fn for_flows(flows: Vec<FlowId>) -> Self {
        Self {
            topics: vec![EventTopic::Flows],
            flows,
        }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &LedgerEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let flow_match = self.flows.is_empty()
            || event
                .flow_id()
                .is_some_and(|flow_id| self.flows.contains(&flow_id));

        topic_match && flow_match
    }
}
