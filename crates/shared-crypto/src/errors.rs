//! Key and signature errors.

use thiserror::Error;

/// Why a key could not be used or a signature did not check out.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// Well-formed signature that does not match the key and message.
    #[error("signature does not verify")]
    SignatureVerificationFailed,

    /// Signature bytes of the wrong length for the key's scheme.
    #[error("signature is {actual} bytes, scheme needs {expected}")]
    InvalidSignatureFormat {
        /// Length the scheme uses.
        expected: usize,
        /// Length received.
        actual: usize,
    },

    /// Not a point on the scheme's curve, or a weak point.
    #[error("public key is not usable")]
    InvalidPublicKey,

    /// Seed outside the scheme's scalar range.
    #[error("private key seed is not usable")]
    InvalidPrivateKey,

    /// Right length but not a canonical signature (for secp256k1, high S).
    #[error("signature is not canonical")]
    InvalidSignature,
}
