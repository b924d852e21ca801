//! # Signature Binding Service
//!
//! Application service layer that implements the `SignatureBindingApi` trait.
//!
//! ## Architecture
//!
//! This is the hexagonal "application service" that:
//! - Implements the inbound port (`SignatureBindingApi`)
//! - Uses the outbound port (`TimeSource`) to timestamp signatures
//! - Delegates encoding and cryptography to the domain layer

use crate::domain::binder::{self, VerificationReport};
use crate::domain::errors::BindingError;
use crate::domain::metadata::{ExtraMetaData, MetaData, TransactionSignature};
use crate::ports::inbound::SignatureBindingApi;
use crate::ports::outbound::{SystemTimeSource, TimeSource};
use shared_crypto::KeyPair;
use shared_types::{ContentRoot, PublicKeyHandle};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Signature Binder.
///
/// Holds the node's platform version and clock; everything else is pure.
#[derive(Clone)]
pub struct SignatureBinder {
    platform_version: u32,
    clock: Arc<dyn TimeSource>,
}

impl SignatureBinder {
    /// Binder using the system clock.
    pub fn new(platform_version: u32) -> Self {
        Self::with_clock(platform_version, Arc::new(SystemTimeSource))
    }

    /// Binder with an explicit clock.
    pub fn with_clock(platform_version: u32, clock: Arc<dyn TimeSource>) -> Self {
        Self {
            platform_version,
            clock,
        }
    }
}

impl std::fmt::Debug for SignatureBinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureBinder")
            .field("platform_version", &self.platform_version)
            .finish_non_exhaustive()
    }
}

impl SignatureBindingApi for SignatureBinder {
    fn platform_version(&self) -> u32 {
        self.platform_version
    }

    fn sign(
        &self,
        key: &KeyPair,
        metadata: MetaData,
    ) -> Result<TransactionSignature, BindingError> {
        binder::sign(key, metadata)
    }

    fn sign_root(
        &self,
        key: &KeyPair,
        root: ContentRoot,
    ) -> Result<TransactionSignature, BindingError> {
        let extra =
            ExtraMetaData::new(self.platform_version).with_timestamp(self.clock.now_millis());
        let metadata = MetaData::with_extra(root, key.public_key(), extra);
        let signed = binder::sign(key, metadata)?;
        debug!(root = %root.short(), signer = %signed.signer, "Signed content root");
        Ok(signed)
    }

    fn verify_self_consistent(&self, signed: &TransactionSignature) -> bool {
        binder::verify_self_consistent(signed)
    }

    fn verify_against(
        &self,
        expected_root: &ContentRoot,
        expected_key: &PublicKeyHandle,
        signed: &TransactionSignature,
    ) -> Result<VerificationReport, BindingError> {
        let report =
            binder::verify_against(expected_root, expected_key, self.platform_version, signed)?;
        if !report.version_matches() {
            warn!(
                signer = %report.signer,
                theirs = report.platform_version,
                ours = report.expected_platform_version,
                "Signature made under a different platform version"
            );
        }
        Ok(report)
    }

    fn verify_against_strict(
        &self,
        expected_root: &ContentRoot,
        expected_key: &PublicKeyHandle,
        signed: &TransactionSignature,
    ) -> Result<(), BindingError> {
        let report =
            binder::verify_against(expected_root, expected_key, self.platform_version, signed)?;
        if !report.version_matches() {
            return Err(BindingError::VersionMismatch {
                expected: report.expected_platform_version,
                actual: report.platform_version,
            });
        }
        Ok(())
    }

    fn verify_all(
        &self,
        root: &ContentRoot,
        required: &BTreeSet<PublicKeyHandle>,
        signatures: &[TransactionSignature],
    ) -> Result<(), BindingError> {
        binder::verify_all(root, required, signatures)
    }
}
