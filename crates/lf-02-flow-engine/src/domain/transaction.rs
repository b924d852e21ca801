//! # Type-State Transactions
//!
//! Side effects of a flow are staged: no notary submission before every
//! required signature exists, no ledger commit before notary acceptance.
//! Each stage is a distinct type and transitions consume `self`, so a
//! flow cannot skip a stage:
//!
//! ```text
//! TransactionBuilder ──sign──→ [CollectingSignatures] ──verify──→ [FullySigned]
//!                                                                     │
//!                                    SignedTransaction ←── [Notarised] ←┘ notary accepts
//! ```

use crate::domain::errors::FlowError;
use lf_01_signature_binding::{BindingError, SignatureBindingApi, TransactionSignature};
use serde::{Deserialize, Serialize};
use shared_types::{
    Command, ContentRoot, Party, PublicKeyHandle, SecureHash, StateAndRef, TransactionState,
    WireTransaction,
};
use std::collections::BTreeSet;
use std::marker::PhantomData;

// =============================================================================
// STATE MARKERS (Zero-Sized Types)
// =============================================================================

/// Marker: content fixed, signatures being gathered.
#[derive(Debug, Clone, Copy)]
pub struct CollectingSignatures;

/// Marker: every required signer has signed; may go to the notary.
#[derive(Debug, Clone, Copy)]
pub struct FullySigned;

/// Marker: notary accepted; may be recorded.
#[derive(Debug, Clone, Copy)]
pub struct Notarised;

// =============================================================================
// BUILDER
// =============================================================================

/// Mutable transaction under construction.
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    notary: Party,
    inputs: Vec<StateAndRef>,
    outputs: Vec<TransactionState>,
    commands: Vec<Command>,
}

impl TransactionBuilder {
    /// Empty transaction to be notarised by `notary`.
    pub fn new(notary: Party) -> Self {
        Self {
            notary,
            inputs: Vec::new(),
            outputs: Vec::new(),
            commands: Vec::new(),
        }
    }

    pub fn add_input(&mut self, input: StateAndRef) -> &mut Self {
        self.inputs.push(input);
        self
    }

    pub fn add_output(&mut self, state: TransactionState) -> &mut Self {
        self.outputs.push(state);
        self
    }

    pub fn add_command(&mut self, command: Command) -> &mut Self {
        self.commands.push(command);
        self
    }

    pub fn inputs(&self) -> &[StateAndRef] {
        &self.inputs
    }

    pub fn notary(&self) -> &Party {
        &self.notary
    }

    /// Freeze the content. A fresh privacy salt makes every freeze a
    /// distinct transaction even for identical components.
    pub fn to_wire(&self) -> WireTransaction {
        WireTransaction {
            inputs: self.inputs.iter().map(|input| input.state_ref).collect(),
            outputs: self.outputs.clone(),
            commands: self.commands.clone(),
            notary: self.notary.clone(),
            privacy_salt: SecureHash(rand::random()),
        }
    }
}

// =============================================================================
// STAGED TRANSACTION
// =============================================================================

/// A frozen transaction in stage `S`.
#[derive(Debug, Clone)]
pub struct StagedTransaction<S> {
    wire: WireTransaction,
    id: ContentRoot,
    signatures: Vec<TransactionSignature>,
    _state: PhantomData<S>,
}

impl<S> StagedTransaction<S> {
    /// Transaction id (its content root).
    pub fn id(&self) -> ContentRoot {
        self.id
    }

    pub fn wire(&self) -> &WireTransaction {
        &self.wire
    }

    pub fn signatures(&self) -> &[TransactionSignature] {
        &self.signatures
    }

    fn into_stage<T>(self) -> StagedTransaction<T> {
        StagedTransaction {
            wire: self.wire,
            id: self.id,
            signatures: self.signatures,
            _state: PhantomData,
        }
    }
}

impl StagedTransaction<CollectingSignatures> {
    /// Fix the content of `wire`; computes its root.
    pub fn new(wire: WireTransaction) -> Result<Self, FlowError> {
        let id = wire.id().map_err(BindingError::from)?;
        Ok(Self {
            wire,
            id,
            signatures: Vec::new(),
            _state: PhantomData,
        })
    }

    /// Add a signature. A second signature by the same key replaces the first.
    pub fn add_signature(&mut self, signature: TransactionSignature) {
        self.signatures.retain(|s| s.signer != signature.signer);
        self.signatures.push(signature);
    }

    /// Required signers that have not signed yet.
    pub fn missing_signers(&self) -> BTreeSet<PublicKeyHandle> {
        let present: BTreeSet<PublicKeyHandle> = self.signatures.iter().map(|s| s.signer).collect();
        self.wire
            .required_signers()
            .difference(&present)
            .copied()
            .collect()
    }

    /// Verify every signature and that none is missing.
    pub fn verify_signatures(
        self,
        binder: &dyn SignatureBindingApi,
    ) -> Result<StagedTransaction<FullySigned>, FlowError> {
        binder.verify_all(&self.id, &self.wire.required_signers(), &self.signatures)?;
        Ok(self.into_stage())
    }
}

impl StagedTransaction<FullySigned> {
    /// Inputs the notary must mark consumed.
    pub fn input_refs(&self) -> BTreeSet<shared_types::StateRef> {
        self.wire.inputs.iter().copied().collect()
    }

    /// Attach the notary's (already verified) signature.
    pub fn notarised(mut self, notary_signature: TransactionSignature) -> StagedTransaction<Notarised> {
        self.signatures.push(notary_signature);
        self.into_stage()
    }
}

impl StagedTransaction<Notarised> {
    /// Wire form of the finished transaction.
    pub fn into_signed(self) -> SignedTransaction {
        SignedTransaction {
            id: self.id,
            wire: self.wire,
            signatures: self.signatures,
        }
    }
}

// =============================================================================
// WIRE FORM
// =============================================================================

/// A notarised transaction as exchanged between nodes and returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    id: ContentRoot,
    wire: WireTransaction,
    signatures: Vec<TransactionSignature>,
}

impl SignedTransaction {
    pub fn id(&self) -> ContentRoot {
        self.id
    }

    pub fn wire(&self) -> &WireTransaction {
        &self.wire
    }

    pub fn signatures(&self) -> &[TransactionSignature] {
        &self.signatures
    }

    /// Full check of a transaction received from elsewhere: the id is the
    /// root of the content, `notary` is the notary it names (on the
    /// transaction and every output), and every required signer plus that
    /// notary signed the root.
    ///
    /// `notary` must come from local configuration. The sender chooses
    /// `wire.notary`, so it cannot vouch for itself.
    pub fn verify(&self, binder: &dyn SignatureBindingApi, notary: &Party) -> Result<(), FlowError> {
        if &self.wire.notary != notary {
            return Err(FlowError::protocol(format!(
                "transaction names notary {}, expected {}",
                self.wire.notary, notary
            )));
        }
        if let Some(output) = self.wire.outputs.iter().find(|o| &o.notary != notary) {
            return Err(FlowError::protocol(format!(
                "output assigned to notary {}, expected {}",
                output.notary, notary
            )));
        }

        let root = self.wire.id().map_err(BindingError::from)?;
        if root != self.id {
            return Err(BindingError::ContentMismatch {
                expected: root,
                actual: self.id,
            }
            .into());
        }

        let mut required = self.wire.required_signers();
        required.insert(self.wire.notary.owning_key);
        binder.verify_all(&root, &required, &self.signatures)?;
        Ok(())
    }
}
