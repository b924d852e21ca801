//! # Binding Errors
//!
//! Error types for metadata encoding and signature binding.
//!
//! None of these are retried automatically: retrying cannot change a
//! cryptographic fact.

use shared_types::{ContentRoot, EncodingError, PublicKeyHandle};
use thiserror::Error;

/// Malformed bytes at the codec boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// Fewer bytes than the frame header.
    #[error("Input too short: {len} bytes")]
    TooShort {
        /// Bytes supplied.
        len: usize,
    },

    /// Frame does not start with the metadata magic.
    #[error("Bad magic")]
    BadMagic,

    /// Layout version this build does not know.
    #[error("Unsupported metadata layout: {0}")]
    UnsupportedLayout(u8),

    /// Input exceeds the encoding limit.
    #[error("Input too large: {len} bytes (max {max})")]
    Oversize {
        /// Bytes supplied.
        len: usize,
        /// Largest accepted frame.
        max: usize,
    },

    /// Body is not a valid encoding (includes trailing bytes).
    #[error("Malformed metadata: {0}")]
    Malformed(String),

    /// Body decodes, but not from its canonical encoding.
    #[error("Non-canonical metadata encoding")]
    NonCanonical,

    /// Signer key is not a valid point for its scheme.
    #[error("Invalid signer public key")]
    InvalidPublicKey,
}

/// Signature binding violations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BindingError {
    /// Signer differs from the key the caller expected (or from the signing key).
    #[error("Key mismatch: expected {expected}, got {actual}")]
    KeyMismatch {
        /// Key the caller expected.
        expected: PublicKeyHandle,
        /// Key actually present.
        actual: PublicKeyHandle,
    },

    /// Signature bytes do not verify over the embedded metadata.
    #[error("Signature by {signer} does not match its metadata")]
    SignatureMismatch {
        /// Claimed signer.
        signer: PublicKeyHandle,
    },

    /// Signature is over a different transaction.
    #[error("Content mismatch: expected {expected}, signed {actual}")]
    ContentMismatch {
        /// Root the caller expected.
        expected: ContentRoot,
        /// Root embedded in the metadata.
        actual: ContentRoot,
    },

    /// Signer ran a different platform version.
    #[error("Platform version mismatch: expected {expected}, got {actual}")]
    VersionMismatch {
        /// Version the caller expected.
        expected: u32,
        /// Version in the metadata.
        actual: u32,
    },

    /// Required signers with no signature present.
    #[error("Missing signatures from {} key(s)", .0.len())]
    MissingSignatures(Vec<PublicKeyHandle>),

    /// Metadata could not be encoded.
    #[error("Encoding failed: {0}")]
    Encode(#[from] EncodingError),

    /// Metadata could not be decoded.
    #[error("Decoding failed: {0}")]
    Decode(#[from] DecodeError),
}
