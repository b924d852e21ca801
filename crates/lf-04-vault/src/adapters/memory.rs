//! In-memory vault store.

use crate::domain::errors::VaultError;
use crate::ports::outbound::VaultStore;
use parking_lot::RwLock;
use shared_types::{SecureHash, StateAndRef, StateRef, VaultUpdate};
use std::collections::{BTreeMap, BTreeSet, HashSet};

#[derive(Debug, Default)]
struct Inner {
    live: BTreeMap<StateRef, StateAndRef>,
    spent: BTreeSet<StateRef>,
    recorded: HashSet<SecureHash>,
}

/// Live states behind one lock; `apply` holds it for writing across the
/// whole delta.
#[derive(Debug, Default)]
pub struct InMemoryVaultStore {
    inner: RwLock<Inner>,
}

impl InMemoryVaultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spent_count(&self) -> usize {
        self.inner.read().spent.len()
    }
}

impl VaultStore for InMemoryVaultStore {
    fn apply(&self, update: &VaultUpdate) -> Result<(), VaultError> {
        let mut inner = self.inner.write();

        let mut refs: Vec<StateRef> = update
            .consumed
            .iter()
            .map(|s| s.state_ref)
            .filter(|r| !inner.live.contains_key(r))
            .collect();
        refs.extend(
            update
                .produced
                .iter()
                .map(|s| s.state_ref)
                .filter(|r| inner.live.contains_key(r) || inner.spent.contains(r)),
        );
        if !refs.is_empty() {
            return Err(VaultError::Conflict { refs });
        }

        for consumed in &update.consumed {
            inner.live.remove(&consumed.state_ref);
            inner.spent.insert(consumed.state_ref);
        }
        for produced in &update.produced {
            inner.live.insert(produced.state_ref, produced.clone());
        }
        inner.recorded.insert(update.tx_id);
        Ok(())
    }

    fn is_recorded(&self, tx_id: &SecureHash) -> bool {
        self.inner.read().recorded.contains(tx_id)
    }

    fn get(&self, state_ref: &StateRef) -> Option<StateAndRef> {
        self.inner.read().live.get(state_ref).cloned()
    }

    fn live_states(&self) -> Vec<StateAndRef> {
        self.inner.read().live.values().cloned().collect()
    }
}
