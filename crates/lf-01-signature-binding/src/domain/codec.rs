//! # MetaData Codec
//!
//! Canonical frame for the signed record:
//!
//! ```text
//! ┌────────────┬────────┬──────────────────────────────────────────────┐
//! │ "LFMD" (4) │ layout │ canonical body (fixint, big-endian)          │
//! │            │  (1)   │ content_root ‖ signer ‖ extra{version, ts, aux}│
//! └────────────┴────────┴──────────────────────────────────────────────┘
//! ```
//!
//! Layout 1 nests `ExtraMetaData` as its own field; the platform version
//! lives inside it. The encoding is the exact payload that gets signed,
//! so decode is fail-closed: any input that does not re-encode to itself
//! byte for byte is rejected.

use crate::domain::errors::DecodeError;
use crate::domain::metadata::MetaData;
use shared_types::{canonical_bytes, from_canonical_bytes, EncodingError, MAX_ENCODED_BYTES};

/// Frame magic.
pub const MAGIC: [u8; 4] = *b"LFMD";

/// Nested `ExtraMetaData` layout.
pub const LAYOUT_V1: u8 = 1;

/// Magic plus layout byte.
pub const HEADER_LEN: usize = MAGIC.len() + 1;

/// Largest frame `decode` accepts.
pub const MAX_FRAME_LEN: usize = HEADER_LEN + MAX_ENCODED_BYTES as usize;

/// Encode metadata into its canonical frame.
///
/// Fails only if the auxiliary fields push the body past the size limit.
pub fn encode(metadata: &MetaData) -> Result<Vec<u8>, EncodingError> {
    let body = canonical_bytes(metadata)?;
    let mut out = Vec::with_capacity(HEADER_LEN + body.len());
    out.extend_from_slice(&MAGIC);
    out.push(LAYOUT_V1);
    out.extend_from_slice(&body);
    Ok(out)
}

/// Decode a canonical frame.
pub fn decode(bytes: &[u8]) -> Result<MetaData, DecodeError> {
    if bytes.len() < HEADER_LEN {
        return Err(DecodeError::TooShort { len: bytes.len() });
    }
    if bytes.len() > MAX_FRAME_LEN {
        return Err(DecodeError::Oversize {
            len: bytes.len(),
            max: MAX_FRAME_LEN,
        });
    }
    if bytes[..MAGIC.len()] != MAGIC {
        return Err(DecodeError::BadMagic);
    }
    let layout = bytes[MAGIC.len()];
    if layout != LAYOUT_V1 {
        return Err(DecodeError::UnsupportedLayout(layout));
    }

    let body = &bytes[HEADER_LEN..];
    let metadata: MetaData =
        from_canonical_bytes(body).map_err(|e| DecodeError::Malformed(e.to_string()))?;

    shared_crypto::validate_public_key(&metadata.signer)
        .map_err(|_| DecodeError::InvalidPublicKey)?;

    // Reject alternative encodings of the same value (e.g. unsorted maps).
    let canonical =
        canonical_bytes(&metadata).map_err(|e| DecodeError::Malformed(e.to_string()))?;
    if canonical.as_slice() != body {
        return Err(DecodeError::NonCanonical);
    }

    Ok(metadata)
}
