//! Requests and verdicts.

use lf_01_signature_binding::TransactionSignature;
use serde::{Deserialize, Serialize};
use shared_types::{ContentRoot, StateRef};
use std::collections::BTreeSet;

/// Ask the notary to consume `inputs` for transaction `root`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotarisationRequest {
    pub inputs: BTreeSet<StateRef>,
    pub root: ContentRoot,
}

/// Outcome of a notarisation request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotaryVerdict {
    /// Every input is now consumed by `root`; signed by the notary.
    Accept(TransactionSignature),
    /// Nothing was consumed.
    Reject { conflicts: Vec<StateRef> },
}

impl NotaryVerdict {
    pub fn is_accept(&self) -> bool {
        matches!(self, Self::Accept(_))
    }
}
