//! Vault errors.

use shared_types::{EncodingError, StateRef};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VaultError {
    /// The delta consumes a state that is not live, or produces one that
    /// already exists or was spent. Nothing was applied.
    #[error("Vault conflict on {} state(s)", .refs.len())]
    Conflict { refs: Vec<StateRef> },

    /// The transaction id could not be computed.
    #[error("Cannot identify transaction: {0}")]
    Encoding(#[from] EncodingError),
}
