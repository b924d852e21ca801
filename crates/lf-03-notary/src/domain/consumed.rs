//! # Consumed States
//!
//! The notary's record of which transaction consumed each state.
//!
//! `commit` is all-or-nothing: either every input becomes consumed by the
//! transaction, or none does and the conflicts are reported. Committing
//! the same transaction again is a no-op that succeeds, so clients may
//! retry after a lost reply.

use crate::domain::errors::UniquenessConflict;
use shared_types::{ContentRoot, StateRef};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Result of a successful commit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Inputs newly consumed.
    Committed,
    /// The transaction had already been committed.
    AlreadyCommitted,
}

#[derive(Debug, Default)]
pub struct ConsumedStates {
    consumed: HashMap<StateRef, ContentRoot>,
    transactions: HashSet<ContentRoot>,
}

impl ConsumedStates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume `inputs` on behalf of `root`.
    pub fn commit(
        &mut self,
        inputs: &BTreeSet<StateRef>,
        root: ContentRoot,
    ) -> Result<CommitOutcome, UniquenessConflict> {
        let consumed_by: BTreeMap<StateRef, ContentRoot> = inputs
            .iter()
            .filter_map(|input| match self.consumed.get(input) {
                Some(by) if *by != root => Some((*input, *by)),
                _ => None,
            })
            .collect();
        if !consumed_by.is_empty() {
            return Err(UniquenessConflict { consumed_by });
        }

        if !self.transactions.insert(root) {
            return Ok(CommitOutcome::AlreadyCommitted);
        }
        for input in inputs {
            self.consumed.insert(*input, root);
        }
        Ok(CommitOutcome::Committed)
    }

    /// Transaction that consumed `state`, if any.
    pub fn consumed_by(&self, state: &StateRef) -> Option<ContentRoot> {
        self.consumed.get(state).copied()
    }

    pub fn consumed_count(&self) -> usize {
        self.consumed.len()
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }
}
