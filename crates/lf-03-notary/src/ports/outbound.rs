//! # Outbound Ports (Driven Ports / SPI)

use crate::domain::consumed::CommitOutcome;
use crate::domain::errors::{NotaryError, UniquenessConflict};
use shared_types::{ContentRoot, StateRef};
use std::collections::BTreeSet;

/// Durable record of consumed states.
///
/// `commit` must be atomic with respect to concurrent commits: of two
/// transactions consuming the same state, exactly one succeeds.
pub trait UniquenessProvider: Send + Sync {
    fn commit(
        &self,
        inputs: &BTreeSet<StateRef>,
        root: ContentRoot,
    ) -> Result<Result<CommitOutcome, UniquenessConflict>, NotaryError>;

    /// Transaction that consumed `state`, if any.
    fn consumed_by(&self, state: &StateRef) -> Result<Option<ContentRoot>, NotaryError>;
}
