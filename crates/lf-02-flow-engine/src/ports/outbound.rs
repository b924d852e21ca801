//! Outbound (Driven) ports for the flow engine.
//!
//! Dependencies a flow instance suspends on: the notary, the local ledger
//! and the session transport to other nodes.

use crate::domain::errors::FlowError;
use crate::domain::transaction::SignedTransaction;
use crate::session::FlowSession;
use async_trait::async_trait;
use lf_01_signature_binding::TransactionSignature;
use shared_types::{ContentRoot, Party, ProtocolId, StateAndRef, StateRef, VaultUpdate};
use std::collections::BTreeSet;
use thiserror::Error;

/// Verdict of a uniqueness request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NotaryResponse {
    /// Inputs consumed; the notary's signature over the root.
    Accept(TransactionSignature),
    /// Some inputs were already consumed by another transaction.
    Reject { conflicts: Vec<StateRef> },
}

/// Transport-level notary failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotaryClientError {
    /// Transient; the request may be retried unchanged.
    #[error("Notary unavailable: {0}")]
    Unavailable(String),

    /// The notary refused to process the request.
    #[error("Notary refused request: {0}")]
    Refused(String),
}

/// Client side of the uniqueness service.
///
/// Requests must be idempotent per transaction root: resubmitting the same
/// root and inputs after a transient failure yields the same verdict.
#[async_trait]
pub trait NotaryClient: Send + Sync {
    /// Identity the notary signs with.
    fn identity(&self) -> &Party;

    /// Ask the notary to consume `inputs` on behalf of transaction `root`.
    async fn request_uniqueness(
        &self,
        inputs: BTreeSet<StateRef>,
        root: ContentRoot,
    ) -> Result<NotaryResponse, NotaryClientError>;
}

/// Local ledger failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// The delta consumes a state that is not live or re-produces one.
    #[error("Ledger conflict on {} state(s)", .refs.len())]
    Conflict { refs: Vec<StateRef> },

    /// Storage could not be reached.
    #[error("Ledger storage: {0}")]
    Storage(String),
}

impl From<LedgerError> for FlowError {
    fn from(error: LedgerError) -> Self {
        FlowError::Ledger(error.to_string())
    }
}

/// The node's ledger as seen by flows.
#[async_trait]
pub trait LedgerPort: Send + Sync {
    /// Apply the delta of a notarised transaction atomically.
    ///
    /// Returns the delta applied; it may be empty when nothing in the
    /// transaction concerns this node.
    async fn record(&self, transaction: &SignedTransaction) -> Result<VaultUpdate, LedgerError>;

    /// Live states, for input selection.
    async fn current_states(&self) -> Vec<StateAndRef>;
}

/// Opens sessions to flow responders on other (or the same) nodes.
#[async_trait]
pub trait SessionTransport: Send + Sync {
    /// Open a session from `initiator` to the `protocol` responder on
    /// `counterparty`.
    ///
    /// Fails with `NoCounterpartyRegistered` when that node has no responder
    /// for the protocol or is not reachable.
    async fn open_session(
        &self,
        initiator: &Party,
        counterparty: &Party,
        protocol: &ProtocolId,
    ) -> Result<FlowSession, FlowError>;
}

/// In-memory notary for testing. Signs every first use of its inputs.
#[cfg(test)]
pub struct MockNotary {
    identity: Party,
    key: shared_crypto::KeyPair,
    binder: lf_01_signature_binding::SignatureBinder,
    consumed: parking_lot::Mutex<std::collections::HashMap<StateRef, ContentRoot>>,
    requests: std::sync::atomic::AtomicUsize,
    unavailable_for: std::sync::atomic::AtomicUsize,
    silent: std::sync::atomic::AtomicBool,
}

#[cfg(test)]
impl MockNotary {
    pub fn new() -> Self {
        use shared_types::{PartyName, SignatureScheme};

        let key = shared_crypto::KeyPair::generate(SignatureScheme::EddsaEd25519);
        Self {
            identity: Party::new(PartyName::new("Notary"), key.public_key()),
            key,
            binder: lf_01_signature_binding::SignatureBinder::new(1),
            consumed: parking_lot::Mutex::new(std::collections::HashMap::new()),
            requests: std::sync::atomic::AtomicUsize::new(0),
            unavailable_for: std::sync::atomic::AtomicUsize::new(0),
            silent: std::sync::atomic::AtomicBool::new(false),
        }
    }

    /// Fail the next `n` requests as unavailable.
    pub fn fail_next(&self, n: usize) {
        self.unavailable_for
            .store(n, std::sync::atomic::Ordering::SeqCst);
    }

    /// Accept requests but never answer them.
    pub fn go_silent(&self) {
        self.silent.store(true, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn requests(&self) -> usize {
        self.requests.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
#[async_trait]
impl NotaryClient for MockNotary {
    fn identity(&self) -> &Party {
        &self.identity
    }

    async fn request_uniqueness(
        &self,
        inputs: BTreeSet<StateRef>,
        root: ContentRoot,
    ) -> Result<NotaryResponse, NotaryClientError> {
        use lf_01_signature_binding::SignatureBindingApi;
        use std::sync::atomic::Ordering;

        self.requests.fetch_add(1, Ordering::SeqCst);
        if self.silent.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        let pending = self.unavailable_for.load(Ordering::SeqCst);
        if pending > 0 {
            self.unavailable_for.store(pending - 1, Ordering::SeqCst);
            return Err(NotaryClientError::Unavailable("mock outage".into()));
        }

        let mut consumed = self.consumed.lock();
        let conflicts: Vec<StateRef> = inputs
            .iter()
            .filter(|input| consumed.get(input).is_some_and(|by| *by != root))
            .copied()
            .collect();
        if !conflicts.is_empty() {
            return Ok(NotaryResponse::Reject { conflicts });
        }
        for input in inputs {
            consumed.insert(input, root);
        }
        let signature = self
            .binder
            .sign_root(&self.key, root)
            .map_err(|e| NotaryClientError::Refused(e.to_string()))?;
        Ok(NotaryResponse::Accept(signature))
    }
}

/// Ledger double recording every transaction's outputs as produced.
#[cfg(test)]
#[derive(Default)]
pub struct MockLedger {
    recorded: parking_lot::Mutex<Vec<VaultUpdate>>,
}

#[cfg(test)]
impl MockLedger {
    pub fn recorded(&self) -> Vec<VaultUpdate> {
        self.recorded.lock().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl LedgerPort for MockLedger {
    async fn record(&self, transaction: &SignedTransaction) -> Result<VaultUpdate, LedgerError> {
        let update = VaultUpdate {
            tx_id: transaction.id(),
            consumed: Vec::new(),
            produced: transaction.wire().out_refs(transaction.id()),
        };
        self.recorded.lock().push(update.clone());
        Ok(update)
    }

    async fn current_states(&self) -> Vec<StateAndRef> {
        self.recorded
            .lock()
            .iter()
            .flat_map(|u| u.produced.iter().cloned())
            .collect()
    }
}
