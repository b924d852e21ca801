//! # Flow Errors
//!
//! Every error inside a flow instance terminates it in `Failed` and is
//! delivered through its completion handle. Across a session only
//! [`RemoteFailure`] travels.

use crate::domain::state::FlowState;
use lf_01_signature_binding::BindingError;
use serde::{Deserialize, Serialize};
use shared_types::{PartyName, ProtocolId, StateRef};
use thiserror::Error;

/// Errors that terminate a flow instance.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FlowError {
    /// The target node has no responder for the protocol (or is unknown).
    #[error("No responder registered on {party} for protocol {protocol}")]
    NoCounterpartyRegistered {
        /// Node that was asked.
        party: PartyName,
        /// Protocol requested.
        protocol: ProtocolId,
    },

    /// Session transport failure, timeout or unexpected message.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The notary rejected the transaction: an input was already consumed.
    #[error("Notary conflict on {} input(s)", .conflicts.len())]
    Conflict {
        /// Inputs consumed by another transaction.
        conflicts: Vec<StateRef>,
    },

    /// Business validation rejected the request.
    #[error("Rejected: {0}")]
    Business(String),

    /// A signature failed binding checks.
    #[error("Signature binding failed: {0}")]
    Binding(#[from] BindingError),

    /// The local ledger refused the commit.
    #[error("Ledger error: {0}")]
    Ledger(String),

    /// Flow logic attempted an edge the state machine does not have.
    #[error("Invalid flow transition {from} -> {to}")]
    InvalidTransition {
        /// State before the attempt.
        from: FlowState,
        /// Requested state.
        to: FlowState,
    },

    /// A cancellation arrived after signing began or after the end.
    #[error("Flow cannot be cancelled in state {state}")]
    CancelRefused {
        /// State when the request arrived.
        state: FlowState,
    },
}

impl FlowError {
    /// Session-level failure with a message.
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }
}

/// What a failed instance tells its counterparties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemoteFailure {
    /// Business rejection, message preserved.
    Business(String),
    /// Notary conflict, inputs preserved.
    Conflict(Vec<StateRef>),
    /// Anything else. Internal detail is not shared.
    Other(String),
}

impl From<&FlowError> for RemoteFailure {
    fn from(error: &FlowError) -> Self {
        match error {
            FlowError::Business(message) => Self::Business(message.clone()),
            FlowError::Conflict { conflicts } => Self::Conflict(conflicts.clone()),
            FlowError::NoCounterpartyRegistered { .. } => {
                Self::Other("counterparty unavailable".to_string())
            }
            FlowError::Protocol(_) => Self::Other("protocol error".to_string()),
            FlowError::Binding(_) => Self::Other("signature verification failed".to_string()),
            FlowError::Ledger(_) => Self::Other("ledger error".to_string()),
            FlowError::InvalidTransition { .. } | FlowError::CancelRefused { .. } => {
                Self::Other("internal error".to_string())
            }
        }
    }
}

impl From<RemoteFailure> for FlowError {
    fn from(failure: RemoteFailure) -> Self {
        match failure {
            RemoteFailure::Business(message) => Self::Business(message),
            RemoteFailure::Conflict(conflicts) => Self::Conflict { conflicts },
            RemoteFailure::Other(reason) => Self::Protocol(format!("counterparty failed: {reason}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::SecureHash;

    #[test]
    fn test_business_and_conflict_survive_the_session() {
        let business = FlowError::Business("BRL is not issued here".into());
        assert_eq!(FlowError::from(RemoteFailure::from(&business)), business);

        let conflict = FlowError::Conflict {
            conflicts: vec![StateRef::new(SecureHash::ZERO, 0)],
        };
        assert_eq!(FlowError::from(RemoteFailure::from(&conflict)), conflict);
    }

    #[test]
    fn test_internal_detail_is_not_shared() {
        let ledger = FlowError::Ledger("disk path /var/lib/vault".into());
        let remote = RemoteFailure::from(&ledger);

        assert_eq!(remote, RemoteFailure::Other("ledger error".into()));
        assert!(matches!(FlowError::from(remote), FlowError::Protocol(_)));
    }
}
