//! # Signature Binding
//!
//! Signing and verification of `MetaData` records.
//!
//! A signature that merely verifies proves nothing about which transaction
//! it covers. `verify_against` pins it to an expected content root and
//! signer key; an old signature presented for new content fails with
//! `ContentMismatch` even though its bytes are still well-formed.

use crate::domain::codec;
use crate::domain::errors::BindingError;
use crate::domain::metadata::{MetaData, TransactionSignature};
use rayon::prelude::*;
use shared_crypto::KeyPair;
use shared_types::{ContentRoot, PublicKeyHandle};
use std::collections::BTreeSet;

/// Outcome of a successful `verify_against`.
///
/// Version differences are reported rather than rejected; callers decide
/// whether a cross-version signature is acceptable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationReport {
    pub signer: PublicKeyHandle,
    pub content_root: ContentRoot,
    pub platform_version: u32,
    pub expected_platform_version: u32,
}

impl VerificationReport {
    pub fn version_matches(&self) -> bool {
        self.platform_version == self.expected_platform_version
    }
}

/// Sign `metadata` with `key`.
///
/// The signer identity is taken from the key, never from the input: if
/// `metadata.signer` names a different key this fails with `KeyMismatch`.
pub fn sign(key: &KeyPair, metadata: MetaData) -> Result<TransactionSignature, BindingError> {
    let signer = key.public_key();
    if metadata.signer != signer {
        return Err(BindingError::KeyMismatch {
            expected: metadata.signer,
            actual: signer,
        });
    }

    let payload = codec::encode(&metadata)?;
    let signature = key.sign(&payload);

    Ok(TransactionSignature {
        signature,
        signer,
        metadata,
    })
}

/// Check the signature against its own embedded metadata.
pub fn check_self_consistent(signed: &TransactionSignature) -> Result<(), BindingError> {
    let mismatch = || BindingError::SignatureMismatch {
        signer: signed.signer,
    };

    if signed.metadata.signer != signed.signer {
        return Err(mismatch());
    }
    let payload = codec::encode(&signed.metadata)?;
    shared_crypto::verify(&signed.signer, &payload, &signed.signature).map_err(|_| mismatch())
}

/// `true` when the signature verifies over its own metadata.
///
/// Says nothing about which transaction the metadata refers to.
pub fn verify_self_consistent(signed: &TransactionSignature) -> bool {
    check_self_consistent(signed).is_ok()
}

/// Verify a signature is the one the caller expects: valid, by
/// `expected_key`, over `expected_root`.
pub fn verify_against(
    expected_root: &ContentRoot,
    expected_key: &PublicKeyHandle,
    expected_version: u32,
    signed: &TransactionSignature,
) -> Result<VerificationReport, BindingError> {
    check_self_consistent(signed)?;

    if signed.signer != *expected_key {
        return Err(BindingError::KeyMismatch {
            expected: *expected_key,
            actual: signed.signer,
        });
    }
    if signed.metadata.content_root != *expected_root {
        return Err(BindingError::ContentMismatch {
            expected: *expected_root,
            actual: signed.metadata.content_root,
        });
    }

    Ok(VerificationReport {
        signer: signed.signer,
        content_root: signed.metadata.content_root,
        platform_version: signed.metadata.platform_version(),
        expected_platform_version: expected_version,
    })
}

/// Verify a transaction's full signature set.
///
/// Every signature must be self-consistent and cover `root`; every key in
/// `required` must have signed. Extra signers (e.g. the notary) are allowed.
/// Signatures are checked in parallel.
pub fn verify_all(
    root: &ContentRoot,
    required: &BTreeSet<PublicKeyHandle>,
    signatures: &[TransactionSignature],
) -> Result<(), BindingError> {
    signatures.par_iter().try_for_each(|signed| {
        check_self_consistent(signed)?;
        if signed.metadata.content_root != *root {
            return Err(BindingError::ContentMismatch {
                expected: *root,
                actual: signed.metadata.content_root,
            });
        }
        Ok(())
    })?;

    let present: BTreeSet<PublicKeyHandle> = signatures.iter().map(|s| s.signer).collect();
    let missing: Vec<PublicKeyHandle> = required.difference(&present).copied().collect();
    if !missing.is_empty() {
        return Err(BindingError::MissingSignatures(missing));
    }
    Ok(())
}
