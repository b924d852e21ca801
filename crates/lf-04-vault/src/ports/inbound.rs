//! # Inbound Ports (Driving Ports / API)

use crate::domain::errors::VaultError;
use crate::domain::query::StateQuery;
use async_trait::async_trait;
use shared_bus::Subscription;
use shared_types::{StateAndRef, VaultUpdate, WireTransaction};

/// Snapshot of matching states plus the updates that follow it.
pub struct VaultTrack {
    pub snapshot: Vec<StateAndRef>,
    /// Vault events strictly after `snapshot`.
    pub updates: Subscription,
}

/// Primary Vault API.
#[async_trait]
pub trait VaultApi: Send + Sync {
    /// Record a notarised transaction: apply the delta relevant to this node
    /// and publish it. An empty delta, or a transaction recorded before,
    /// yields an empty update and no event.
    async fn record_transaction(&self, wire: &WireTransaction) -> Result<VaultUpdate, VaultError>;

    async fn current_states(&self) -> Vec<StateAndRef>;

    async fn query(&self, query: &StateQuery) -> Vec<StateAndRef>;

    /// Snapshot and subscription taken atomically with respect to commits.
    async fn track(&self, query: &StateQuery) -> VaultTrack;
}
