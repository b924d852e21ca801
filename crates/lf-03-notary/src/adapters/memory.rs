//! In-memory uniqueness provider.

use crate::domain::consumed::{CommitOutcome, ConsumedStates};
use crate::domain::errors::{NotaryError, UniquenessConflict};
use crate::ports::outbound::UniquenessProvider;
use parking_lot::Mutex;
use shared_types::{ContentRoot, StateRef};
use std::collections::BTreeSet;

/// Single-process provider; one lock serialises every commit.
#[derive(Debug, Default)]
pub struct InMemoryUniquenessProvider {
    states: Mutex<ConsumedStates>,
}

impl InMemoryUniquenessProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn consumed_count(&self) -> usize {
        self.states.lock().consumed_count()
    }
}

impl UniquenessProvider for InMemoryUniquenessProvider {
    fn commit(
        &self,
        inputs: &BTreeSet<StateRef>,
        root: ContentRoot,
    ) -> Result<Result<CommitOutcome, UniquenessConflict>, NotaryError> {
        Ok(self.states.lock().commit(inputs, root))
    }

    fn consumed_by(&self, state: &StateRef) -> Result<Option<ContentRoot>, NotaryError> {
        Ok(self.states.lock().consumed_by(state))
    }
}
