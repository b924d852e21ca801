//! # Notary Service
//!
//! Application service implementing `NotaryApi` over a `UniquenessProvider`.
//! Accepted roots are signed through the Signature Binder with the notary's
//! own key, so participants verify the verdict like any other signature.

use crate::domain::consumed::CommitOutcome;
use crate::domain::errors::NotaryError;
use crate::domain::verdict::{NotarisationRequest, NotaryVerdict};
use crate::ports::inbound::NotaryApi;
use crate::ports::outbound::UniquenessProvider;
use async_trait::async_trait;
use lf_01_signature_binding::{SignatureBinder, SignatureBindingApi};
use shared_crypto::KeyPair;
use shared_types::{Party, PartyName};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct NotaryStats {
    submissions: AtomicU64,
    commits: AtomicU64,
    rejections: AtomicU64,
}

/// Uniqueness notary.
pub struct NotaryService {
    identity: Party,
    key: KeyPair,
    binder: SignatureBinder,
    provider: Arc<dyn UniquenessProvider>,
    stats: NotaryStats,
}

impl NotaryService {
    pub fn new(
        name: PartyName,
        key: KeyPair,
        binder: SignatureBinder,
        provider: Arc<dyn UniquenessProvider>,
    ) -> Self {
        Self {
            identity: Party::new(name, key.public_key()),
            key,
            binder,
            provider,
            stats: NotaryStats::default(),
        }
    }

    /// Requests received.
    pub fn submissions(&self) -> u64 {
        self.stats.submissions.load(Ordering::Relaxed)
    }

    /// Transactions whose inputs were newly consumed.
    pub fn commits(&self) -> u64 {
        self.stats.commits.load(Ordering::Relaxed)
    }

    /// Requests rejected for conflicts.
    pub fn rejections(&self) -> u64 {
        self.stats.rejections.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for NotaryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotaryService")
            .field("identity", &self.identity)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl NotaryApi for NotaryService {
    fn identity(&self) -> &Party {
        &self.identity
    }

    async fn notarise(&self, request: NotarisationRequest) -> Result<NotaryVerdict, NotaryError> {
        self.stats.submissions.fetch_add(1, Ordering::Relaxed);
        let root = request.root;

        match self.provider.commit(&request.inputs, root)? {
            Ok(outcome) => {
                let signature = self.binder.sign_root(&self.key, root)?;
                match outcome {
                    CommitOutcome::Committed => {
                        self.stats.commits.fetch_add(1, Ordering::Relaxed);
                        info!(tx_id = %root.short(), inputs = request.inputs.len(), "Notarised transaction");
                    }
                    CommitOutcome::AlreadyCommitted => {
                        debug!(tx_id = %root.short(), "Repeated notarisation request");
                    }
                }
                Ok(NotaryVerdict::Accept(signature))
            }
            Err(conflict) => {
                self.stats.rejections.fetch_add(1, Ordering::Relaxed);
                warn!(tx_id = %root.short(), %conflict, "Rejected double spend");
                Ok(NotaryVerdict::Reject {
                    conflicts: conflict.conflicts(),
                })
            }
        }
    }
}
