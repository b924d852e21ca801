//! Notary errors.

use lf_01_signature_binding::BindingError;
use shared_types::{ContentRoot, StateRef};
use std::collections::BTreeMap;
use thiserror::Error;

/// Some inputs were already consumed by other transactions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{} input(s) already consumed", .consumed_by.len())]
pub struct UniquenessConflict {
    /// Each conflicting input and the transaction that consumed it.
    pub consumed_by: BTreeMap<StateRef, ContentRoot>,
}

impl UniquenessConflict {
    pub fn conflicts(&self) -> Vec<StateRef> {
        self.consumed_by.keys().copied().collect()
    }
}

/// Failures of the notary service itself. A conflict is a verdict, not an
/// error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotaryError {
    /// The consumption store could not be reached.
    #[error("Uniqueness store unavailable: {0}")]
    StoreUnavailable(String),

    /// Signing the accepted root failed.
    #[error("Notary signing failed: {0}")]
    Signing(#[from] BindingError),
}
