//! Issuance request and result.

use lf_02_flow_engine::SignedTransaction;
use serde::{Deserialize, Serialize};
use shared_types::{Amount, OpaqueBytes, Party};

/// What the requester asks the issuer for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuanceRequest {
    pub amount: Amount,
    /// Final owner of the issued cash.
    pub issue_to: Party,
    /// Reference the issuer records against the issuance.
    pub issuer_reference: OpaqueBytes,
    pub notary: Party,
}

/// Requester's result: the transaction that delivered the cash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IssuanceResult {
    pub stx: SignedTransaction,
    pub recipient: Party,
}
