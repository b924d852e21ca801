//! State selection.

use shared_types::{ContractId, PublicKeyHandle, StateAndRef};

/// Criteria a live state must meet. Empty criteria match everything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StateQuery {
    pub contract: Option<ContractId>,
    pub participant: Option<PublicKeyHandle>,
}

impl StateQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn contract(contract: ContractId) -> Self {
        Self {
            contract: Some(contract),
            participant: None,
        }
    }

    pub fn with_participant(mut self, participant: PublicKeyHandle) -> Self {
        self.participant = Some(participant);
        self
    }

    pub fn matches(&self, state: &StateAndRef) -> bool {
        let contract_ok = self
            .contract
            .as_ref()
            .map_or(true, |c| *c == state.state.contract);
        let participant_ok = self
            .participant
            .as_ref()
            .map_or(true, |k| state.state.participants.contains(k));
        contract_ok && participant_ok
    }
}
