//! # Ledger Entities
//!
//! States, transactions and vault deltas.
//!
//! A transaction's identity is its content root: the Merkle root over salted
//! hashes of every canonically encoded component. Changing any input, output,
//! command, the notary or the salt changes the root.

use crate::codec::canonical_bytes;
use crate::entities::{ContentRoot, OpaqueBytes, Party, PublicKeyHandle, SecureHash};
use crate::errors::EncodingError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Reference to one output of a committed transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateRef {
    /// Id (content root) of the producing transaction.
    pub tx_id: SecureHash,
    /// Output index within that transaction.
    pub index: u32,
}

impl StateRef {
    /// Create a state reference.
    pub fn new(tx_id: SecureHash, index: u32) -> Self {
        Self { tx_id, index }
    }
}

impl fmt::Display for StateRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.tx_id.short(), self.index)
    }
}

/// Name of the contract governing a state, e.g. `cash`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContractId(pub String);

impl ContractId {
    /// Create a contract identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A ledger state as it appears in a transaction output.
///
/// `data` is the contract-specific payload in canonical encoding; the ledger
/// core never interprets it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionState {
    /// Contract governing this state.
    pub contract: ContractId,
    /// Keys for which this state is relevant.
    pub participants: Vec<PublicKeyHandle>,
    /// Notary responsible for consuming this state.
    pub notary: Party,
    /// Contract payload.
    pub data: OpaqueBytes,
}

impl TransactionState {
    /// Whether any of `keys` participates in this state.
    pub fn is_relevant_to(&self, keys: &BTreeSet<PublicKeyHandle>) -> bool {
        self.participants.iter().any(|k| keys.contains(k))
    }
}

/// A state together with the reference it was committed under.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateAndRef {
    /// The state.
    pub state: TransactionState,
    /// Where it was committed.
    pub state_ref: StateRef,
}

/// A command: an instruction to a contract plus the keys that must sign.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Command {
    /// Command name, e.g. `cash.issue`.
    pub name: String,
    /// Keys that must sign any transaction carrying this command.
    pub signers: Vec<PublicKeyHandle>,
    /// Optional command payload.
    pub data: OpaqueBytes,
}

impl Command {
    /// Create a command without payload.
    pub fn new(name: impl Into<String>, signers: Vec<PublicKeyHandle>) -> Self {
        Self {
            name: name.into(),
            signers,
            data: OpaqueBytes::default(),
        }
    }
}

/// Component group tags, mixed into every leaf hash.
mod group {
    pub const INPUTS: u8 = 0;
    pub const OUTPUTS: u8 = 1;
    pub const COMMANDS: u8 = 2;
    pub const NOTARY: u8 = 3;
}

/// The content of a transaction, before signatures.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireTransaction {
    /// States consumed.
    pub inputs: Vec<StateRef>,
    /// States produced.
    pub outputs: Vec<TransactionState>,
    /// Commands and their required signers.
    pub commands: Vec<Command>,
    /// Notary that must witness the consumption of `inputs`.
    pub notary: Party,
    /// Random salt making otherwise identical transactions distinct.
    pub privacy_salt: SecureHash,
}

impl WireTransaction {
    /// Content root (Merkle root over salted component hashes).
    pub fn content_root(&self) -> Result<ContentRoot, EncodingError> {
        let mut leaves = Vec::with_capacity(
            self.inputs.len() + self.outputs.len() + self.commands.len() + 1,
        );
        for (i, input) in self.inputs.iter().enumerate() {
            leaves.push(self.leaf(group::INPUTS, i, &canonical_bytes(input)?));
        }
        for (i, output) in self.outputs.iter().enumerate() {
            leaves.push(self.leaf(group::OUTPUTS, i, &canonical_bytes(output)?));
        }
        for (i, command) in self.commands.iter().enumerate() {
            leaves.push(self.leaf(group::COMMANDS, i, &canonical_bytes(command)?));
        }
        leaves.push(self.leaf(group::NOTARY, 0, &canonical_bytes(&self.notary)?));
        Ok(SecureHash::merkle_root(&leaves))
    }

    /// Transaction id; identical to the content root.
    pub fn id(&self) -> Result<SecureHash, EncodingError> {
        self.content_root()
    }

    /// Every key some command requires a signature from.
    pub fn required_signers(&self) -> BTreeSet<PublicKeyHandle> {
        self.commands
            .iter()
            .flat_map(|c| c.signers.iter().copied())
            .collect()
    }

    /// References of the outputs once this transaction commits as `tx_id`.
    pub fn output_refs(&self, tx_id: SecureHash) -> Vec<StateRef> {
        (0..self.outputs.len())
            .map(|i| StateRef::new(tx_id, i as u32))
            .collect()
    }

    /// Outputs paired with the references they commit under.
    pub fn out_refs(&self, tx_id: SecureHash) -> Vec<StateAndRef> {
        self.outputs
            .iter()
            .cloned()
            .zip(self.output_refs(tx_id))
            .map(|(state, state_ref)| StateAndRef { state, state_ref })
            .collect()
    }

    fn leaf(&self, tag: u8, index: usize, component: &[u8]) -> SecureHash {
        let mut data = Vec::with_capacity(32 + 1 + 4 + component.len());
        data.extend_from_slice(self.privacy_salt.as_bytes());
        data.push(tag);
        data.extend_from_slice(&(index as u32).to_be_bytes());
        data.extend_from_slice(component);
        SecureHash::sha256(&data)
    }
}

/// Delta applied to a node's vault by one committed transaction.
///
/// Emitted once per recorded transaction that touches the vault and never
/// mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultUpdate {
    /// Transaction that caused the delta.
    pub tx_id: SecureHash,
    /// Live states invalidated.
    pub consumed: Vec<StateAndRef>,
    /// New live states.
    pub produced: Vec<StateAndRef>,
}

impl VaultUpdate {
    /// Whether the delta changes nothing.
    pub fn is_empty(&self) -> bool {
        self.consumed.is_empty() && self.produced.is_empty()
    }

    /// References consumed.
    pub fn consumed_refs(&self) -> BTreeSet<StateRef> {
        self.consumed.iter().map(|s| s.state_ref).collect()
    }

    /// References produced.
    pub fn produced_refs(&self) -> BTreeSet<StateRef> {
        self.produced.iter().map(|s| s.state_ref).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::PartyName;

    fn notary() -> Party {
        Party::new(PartyName::new("O=Notary"), PublicKeyHandle::Ed25519([9u8; 32]))
    }

    fn owner() -> PublicKeyHandle {
        PublicKeyHandle::Ed25519([1u8; 32])
    }

    fn issue_tx(salt: u8) -> WireTransaction {
        WireTransaction {
            inputs: vec![],
            outputs: vec![TransactionState {
                contract: ContractId::new("cash"),
                participants: vec![owner()],
                notary: notary(),
                data: OpaqueBytes(vec![1, 2, 3]),
            }],
            commands: vec![Command::new("cash.issue", vec![owner()])],
            notary: notary(),
            privacy_salt: SecureHash::sha256(&[salt]),
        }
    }

    #[test]
    fn test_content_root_deterministic() {
        let tx = issue_tx(1);
        assert_eq!(tx.content_root().unwrap(), tx.clone().content_root().unwrap());
    }

    #[test]
    fn test_salt_changes_root() {
        assert_ne!(
            issue_tx(1).content_root().unwrap(),
            issue_tx(2).content_root().unwrap()
        );
    }

    #[test]
    fn test_any_component_changes_root() {
        let base = issue_tx(1);
        let root = base.content_root().unwrap();

        let mut changed = base.clone();
        changed.outputs[0].data = OpaqueBytes(vec![1, 2, 4]);
        assert_ne!(changed.content_root().unwrap(), root);

        let mut changed = base.clone();
        changed.inputs.push(StateRef::new(SecureHash::sha256(b"x"), 0));
        assert_ne!(changed.content_root().unwrap(), root);

        let mut changed = base;
        changed.commands[0].name = "cash.move".into();
        assert_ne!(changed.content_root().unwrap(), root);
    }

    #[test]
    fn test_required_signers_deduplicated() {
        let mut tx = issue_tx(1);
        tx.commands.push(Command::new("cash.move", vec![owner()]));
        assert_eq!(tx.required_signers().len(), 1);
    }

    #[test]
    fn test_out_refs_indices() {
        let tx = issue_tx(1);
        let id = tx.id().unwrap();
        let refs = tx.out_refs(id);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].state_ref, StateRef::new(id, 0));
    }

    #[test]
    fn test_relevance() {
        let tx = issue_tx(1);
        let mine: BTreeSet<_> = [owner()].into_iter().collect();
        let theirs: BTreeSet<_> = [PublicKeyHandle::Ed25519([2u8; 32])].into_iter().collect();
        assert!(tx.outputs[0].is_relevant_to(&mine));
        assert!(!tx.outputs[0].is_relevant_to(&theirs));
    }
}
