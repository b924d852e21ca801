//! # Vault Service
//!
//! Application service implementing `VaultApi`.
//!
//! Commits are serialised: computing the delta, applying it and publishing
//! it happen under one lock, so subscribers receive updates in the order
//! the transactions were recorded, and `track` can take a snapshot that
//! no update straddles.

use crate::domain::delta::relevant_delta;
use crate::domain::errors::VaultError;
use crate::domain::query::StateQuery;
use crate::ports::inbound::{VaultApi, VaultTrack};
use crate::ports::outbound::VaultStore;
use async_trait::async_trait;
use shared_bus::{EventFilter, EventPublisher, EventTopic, InMemoryEventBus, LedgerEvent};
use shared_types::{ContractId, PublicKeyHandle, StateAndRef, VaultUpdate, WireTransaction};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// A node's vault.
pub struct VaultService {
    store: Arc<dyn VaultStore>,
    bus: Arc<InMemoryEventBus>,
    our_keys: BTreeSet<PublicKeyHandle>,
    commit_lock: Mutex<()>,
    updates_published: AtomicU64,
}

impl VaultService {
    /// Vault for a node owning `our_keys`, publishing on `bus`.
    pub fn new(
        store: Arc<dyn VaultStore>,
        bus: Arc<InMemoryEventBus>,
        our_keys: BTreeSet<PublicKeyHandle>,
    ) -> Self {
        Self {
            store,
            bus,
            our_keys,
            commit_lock: Mutex::new(()),
            updates_published: AtomicU64::new(0),
        }
    }

    pub fn our_keys(&self) -> &BTreeSet<PublicKeyHandle> {
        &self.our_keys
    }

    pub async fn states_by_contract(&self, contract: &ContractId) -> Vec<StateAndRef> {
        self.query(&StateQuery::contract(contract.clone())).await
    }

    /// Vault updates published since creation.
    pub fn updates_published(&self) -> u64 {
        self.updates_published.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for VaultService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultService")
            .field("our_keys", &self.our_keys)
            .field("updates_published", &self.updates_published())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl VaultApi for VaultService {
    async fn record_transaction(&self, wire: &WireTransaction) -> Result<VaultUpdate, VaultError> {
        let tx_id = wire.id()?;
        let _commit = self.commit_lock.lock().await;

        if self.store.is_recorded(&tx_id) {
            debug!(tx_id = %tx_id.short(), "Transaction already recorded");
            return Ok(VaultUpdate {
                tx_id,
                consumed: Vec::new(),
                produced: Vec::new(),
            });
        }

        let update = relevant_delta(wire, tx_id, &self.our_keys, |r| self.store.get(r));
        if update.is_empty() {
            debug!(tx_id = %tx_id.short(), "Transaction does not concern this vault");
            return Ok(update);
        }

        self.store.apply(&update)?;
        self.bus.publish(LedgerEvent::VaultUpdated(update.clone())).await;
        self.updates_published.fetch_add(1, Ordering::Relaxed);
        info!(
            tx_id = %tx_id.short(),
            consumed = update.consumed.len(),
            produced = update.produced.len(),
            "Vault updated"
        );
        Ok(update)
    }

    async fn current_states(&self) -> Vec<StateAndRef> {
        self.store.live_states()
    }

    async fn query(&self, query: &StateQuery) -> Vec<StateAndRef> {
        self.store
            .live_states()
            .into_iter()
            .filter(|state| query.matches(state))
            .collect()
    }

    async fn track(&self, query: &StateQuery) -> VaultTrack {
        let _commit = self.commit_lock.lock().await;
        let updates = self.bus.subscribe(EventFilter::topics(vec![EventTopic::Vault]));
        let snapshot = self
            .store
            .live_states()
            .into_iter()
            .filter(|state| query.matches(state))
            .collect();
        VaultTrack { snapshot, updates }
    }
}
