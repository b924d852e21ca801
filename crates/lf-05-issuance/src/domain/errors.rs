//! Issuance errors.

use lf_02_flow_engine::FlowError;
use shared_types::{Currency, PartyName};
use thiserror::Error;

/// Business rejections. Raised before anything is signed or submitted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IssuanceError {
    #[error("Issuance of {0} is not permitted")]
    CurrencyNotAllowed(Currency),

    #[error("Issuance amount must be positive")]
    NonPositiveAmount,

    #[error("Notary {0} is not the issuer's notary")]
    UnknownNotary(PartyName),

    /// A state claiming to be cash does not decode as cash.
    #[error("Malformed cash state: {0}")]
    MalformedState(String),

    #[error("Cash state is not owned by this node")]
    NotOwner,
}

impl From<IssuanceError> for FlowError {
    fn from(error: IssuanceError) -> Self {
        FlowError::Business(error.to_string())
    }
}
