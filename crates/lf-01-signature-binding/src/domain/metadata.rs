//! # Signed Records
//!
//! `MetaData` is the exact record a party signs: the content root of the
//! transaction, the signer's public key and the protocol version the signer
//! was running. `TransactionSignature` couples the raw signature with the
//! record it was made over, so verification never needs an out-of-band copy.

use serde::{Deserialize, Serialize};
use shared_types::{ContentRoot, PublicKeyHandle};
use std::collections::BTreeMap;

/// Signer-supplied fields carried alongside the content root.
///
/// The auxiliary map is ordered so its encoding is deterministic.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExtraMetaData {
    /// Platform version of the signing node.
    pub platform_version: u32,
    /// Wall-clock time of signing, if the signer chose to include it.
    pub timestamp_millis: Option<u64>,
    /// Open extension point.
    pub auxiliary: BTreeMap<String, Vec<u8>>,
}

impl ExtraMetaData {
    /// Only a version, no optional fields.
    pub fn new(platform_version: u32) -> Self {
        Self {
            platform_version,
            timestamp_millis: None,
            auxiliary: BTreeMap::new(),
        }
    }

    /// Builder: set the signing timestamp.
    pub fn with_timestamp(mut self, millis: u64) -> Self {
        self.timestamp_millis = Some(millis);
        self
    }

    /// Builder: add an auxiliary field.
    pub fn with_auxiliary(mut self, key: impl Into<String>, value: Vec<u8>) -> Self {
        self.auxiliary.insert(key.into(), value);
        self
    }
}

/// The record covered by a transaction signature.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MetaData {
    /// Root of the transaction being signed.
    pub content_root: ContentRoot,
    /// Key the signature is made with.
    pub signer: PublicKeyHandle,
    /// Version and optional fields.
    pub extra: ExtraMetaData,
}

impl MetaData {
    /// Metadata with no optional fields.
    pub fn new(platform_version: u32, content_root: ContentRoot, signer: PublicKeyHandle) -> Self {
        Self {
            content_root,
            signer,
            extra: ExtraMetaData::new(platform_version),
        }
    }

    pub fn with_extra(
        content_root: ContentRoot,
        signer: PublicKeyHandle,
        extra: ExtraMetaData,
    ) -> Self {
        Self {
            content_root,
            signer,
            extra,
        }
    }

    /// Platform version the signer declared.
    pub fn platform_version(&self) -> u32 {
        self.extra.platform_version
    }
}

/// A signature bound to the metadata it was made over.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionSignature {
    /// Raw signature over the canonical encoding of `metadata`.
    pub signature: Vec<u8>,
    /// Public key of the signer.
    pub signer: PublicKeyHandle,
    /// The record that was signed.
    pub metadata: MetaData,
}

impl TransactionSignature {
    /// Root this signature claims to cover.
    pub fn content_root(&self) -> ContentRoot {
        self.metadata.content_root
    }
}
