//! Vault adapter - the flow engine's ledger port over the node's vault.

use async_trait::async_trait;
use lf_02_flow_engine::{LedgerError, LedgerPort, SignedTransaction};
use lf_04_vault::{VaultApi, VaultError, VaultService};
use shared_types::{StateAndRef, VaultUpdate};
use std::sync::Arc;

/// `LedgerPort` recording into a [`VaultService`].
#[derive(Clone, Debug)]
pub struct VaultLedgerAdapter {
    vault: Arc<VaultService>,
}

impl VaultLedgerAdapter {
    pub fn new(vault: Arc<VaultService>) -> Self {
        Self { vault }
    }
}

#[async_trait]
impl LedgerPort for VaultLedgerAdapter {
    async fn record(&self, transaction: &SignedTransaction) -> Result<VaultUpdate, LedgerError> {
        self.vault
            .record_transaction(transaction.wire())
            .await
            .map_err(|e| match e {
                VaultError::Conflict { refs } => LedgerError::Conflict { refs },
                VaultError::Encoding(_) => LedgerError::Storage(e.to_string()),
            })
    }

    async fn current_states(&self) -> Vec<StateAndRef> {
        self.vault.current_states().await
    }
}
