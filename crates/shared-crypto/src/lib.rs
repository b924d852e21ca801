//! # Shared Crypto - Signing Key Pairs
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `ecdsa` | secp256k1 / SHA-256 | Party identities (default scheme) |
//! | `ed25519` | Ed25519 (strict verification) | Notary identities |
//! | `keys` | both | Scheme-agnostic `KeyPair` and verification by `PublicKeyHandle` |
//!
//! ## Security Properties
//!
//! - **secp256k1**: RFC 6979 deterministic nonces, message digested with SHA-256
//! - **Ed25519**: Deterministic nonces, strict verification, weak keys refused
//! - Seeds are zeroized once the signing key is built

#![warn(missing_docs)]
#![warn(clippy::all)]

mod ecdsa;
mod ed25519;
pub mod errors;
pub mod keys;

// Re-exports
pub use errors::CryptoError;
pub use keys::{validate_public_key, verify, KeyPair};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
