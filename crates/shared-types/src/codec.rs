//! # Canonical Encoding
//!
//! Deterministic byte encoding used wherever bytes are hashed or signed.
//!
//! The options are fixed: fixed-width big-endian integers, no trailing bytes
//! and a hard size limit. Types encoded here must not contain unordered
//! collections (use `BTreeMap`/`BTreeSet`, never `HashMap`).

use crate::errors::EncodingError;
use bincode::Options;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Upper bound on any canonically encoded value.
pub const MAX_ENCODED_BYTES: u64 = 4 * 1024 * 1024;

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_big_endian()
        .reject_trailing_bytes()
        .with_limit(MAX_ENCODED_BYTES)
}

/// Encode a value canonically.
pub fn canonical_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, EncodingError> {
    options()
        .serialize(value)
        .map_err(|e| EncodingError::Encode(e.to_string()))
}

/// Decode a canonically encoded value. Trailing bytes are an error.
pub fn from_canonical_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, EncodingError> {
    options()
        .deserialize(bytes)
        .map_err(|e| EncodingError::Decode(e.to_string()))
}
