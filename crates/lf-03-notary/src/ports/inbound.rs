//! # Inbound Ports (Driving Ports / API)

use crate::domain::errors::NotaryError;
use crate::domain::verdict::{NotarisationRequest, NotaryVerdict};
use async_trait::async_trait;
use shared_types::Party;

/// Primary Notary API.
#[async_trait]
pub trait NotaryApi: Send + Sync {
    /// Identity whose key signs accepted transactions.
    fn identity(&self) -> &Party;

    /// Consume the request's inputs, or report which are already consumed.
    ///
    /// Idempotent per root: repeating an accepted request accepts again
    /// without consuming anything further.
    async fn notarise(&self, request: NotarisationRequest) -> Result<NotaryVerdict, NotaryError>;
}
