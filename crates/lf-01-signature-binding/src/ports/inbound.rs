//! # Inbound Ports (Driving Ports / API)
//!
//! Traits that define the public API of this subsystem.

use crate::domain::binder::VerificationReport;
use crate::domain::errors::BindingError;
use crate::domain::metadata::{MetaData, TransactionSignature};
use shared_crypto::KeyPair;
use shared_types::{ContentRoot, PublicKeyHandle};
use std::collections::BTreeSet;

/// Primary Signature Binding API.
///
/// Implementations must be thread-safe (`Send + Sync`).
pub trait SignatureBindingApi: Send + Sync {
    /// Platform version this node signs with and expects.
    fn platform_version(&self) -> u32;

    /// Sign caller-built metadata. `KeyMismatch` if it names another key.
    fn sign(&self, key: &KeyPair, metadata: MetaData)
        -> Result<TransactionSignature, BindingError>;

    /// Sign a content root with this node's version and a timestamp.
    fn sign_root(
        &self,
        key: &KeyPair,
        root: ContentRoot,
    ) -> Result<TransactionSignature, BindingError>;

    /// Internal consistency only.
    fn verify_self_consistent(&self, signed: &TransactionSignature) -> bool;

    /// Pin a signature to an expected root and signer. Version differences
    /// are reported in the returned `VerificationReport`.
    fn verify_against(
        &self,
        expected_root: &ContentRoot,
        expected_key: &PublicKeyHandle,
        signed: &TransactionSignature,
    ) -> Result<VerificationReport, BindingError>;

    /// As `verify_against`, but a version difference is an error.
    fn verify_against_strict(
        &self,
        expected_root: &ContentRoot,
        expected_key: &PublicKeyHandle,
        signed: &TransactionSignature,
    ) -> Result<(), BindingError>;

    /// Verify a transaction's signature set against its root and required signers.
    fn verify_all(
        &self,
        root: &ContentRoot,
        required: &BTreeSet<PublicKeyHandle>,
        signatures: &[TransactionSignature],
    ) -> Result<(), BindingError>;
}
