//! # Cash
//!
//! A fungible claim on an issuer. The ledger sees a `TransactionState`
//! with contract `cash` whose payload is the canonical encoding of
//! [`CashState`].

use crate::domain::errors::IssuanceError;
use lf_02_flow_engine::TransactionBuilder;
use serde::{Deserialize, Serialize};
use shared_types::{
    canonical_bytes, from_canonical_bytes, Amount, Command, ContractId, OpaqueBytes, Party,
    PartyAndReference, PublicKeyHandle, StateAndRef, TransactionState,
};

pub const CASH_CONTRACT: &str = "cash";
pub const ISSUE_COMMAND: &str = "cash.issue";
pub const MOVE_COMMAND: &str = "cash.move";

/// Contract payload of a cash state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashState {
    pub amount: Amount,
    /// Issuer and its issuance reference.
    pub issuer: PartyAndReference,
    pub owner: PublicKeyHandle,
}

impl CashState {
    /// Ledger form, notarised by `notary`.
    pub fn to_state(&self, notary: &Party) -> Result<TransactionState, IssuanceError> {
        let data = canonical_bytes(self).map_err(|e| IssuanceError::MalformedState(e.to_string()))?;
        Ok(TransactionState {
            contract: ContractId::new(CASH_CONTRACT),
            participants: vec![self.owner],
            notary: notary.clone(),
            data: OpaqueBytes(data),
        })
    }

    /// Decode the payload of a `cash` state.
    pub fn from_state(state: &TransactionState) -> Result<Self, IssuanceError> {
        if state.contract.0 != CASH_CONTRACT {
            return Err(IssuanceError::MalformedState(format!(
                "contract is {}",
                state.contract
            )));
        }
        from_canonical_bytes(state.data.as_slice())
            .map_err(|e| IssuanceError::MalformedState(e.to_string()))
    }

    pub fn with_owner(&self, owner: PublicKeyHandle) -> Self {
        Self {
            owner,
            ..self.clone()
        }
    }
}

/// Add an issuance of `amount` by `issuer` to `owner`. The issuer signs.
pub fn generate_issue(
    builder: &mut TransactionBuilder,
    amount: Amount,
    issuer: PartyAndReference,
    owner: PublicKeyHandle,
) -> Result<(), IssuanceError> {
    let issuer_key = issuer.party.owning_key;
    let cash = CashState {
        amount,
        issuer,
        owner,
    };
    let state = cash.to_state(builder.notary())?;
    builder
        .add_output(state)
        .add_command(Command::new(ISSUE_COMMAND, vec![issuer_key]));
    Ok(())
}

/// Move the whole of `input` to `new_owner`. The current owner signs.
pub fn generate_move(
    builder: &mut TransactionBuilder,
    input: StateAndRef,
    new_owner: PublicKeyHandle,
) -> Result<CashState, IssuanceError> {
    let cash = CashState::from_state(&input.state)?;
    let moved = cash.with_owner(new_owner);
    let state = moved.to_state(builder.notary())?;
    builder
        .add_input(input)
        .add_output(state)
        .add_command(Command::new(MOVE_COMMAND, vec![cash.owner]));
    Ok(moved)
}

/// Cash outputs of `states`, decoded.
pub fn cash_outputs<'a>(
    states: impl IntoIterator<Item = &'a TransactionState>,
) -> Vec<CashState> {
    states
        .into_iter()
        .filter(|s| s.contract.0 == CASH_CONTRACT)
        .filter_map(|s| CashState::from_state(s).ok())
        .collect()
}
