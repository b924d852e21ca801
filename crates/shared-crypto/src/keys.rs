//! Scheme-agnostic key pairs.
//!
//! Parties and notaries hold a [`KeyPair`]; everything that only needs the
//! public half works with [`PublicKeyHandle`] and [`verify`].

use crate::ecdsa::{self, Secp256k1Key};
use crate::ed25519::{self, Ed25519Key};
use crate::CryptoError;
use shared_types::{PublicKeyHandle, SignatureScheme};

/// A signing key pair for one of the supported schemes.
pub struct KeyPair {
    inner: Inner,
    public: PublicKeyHandle,
}

enum Inner {
    Secp256k1(Secp256k1Key),
    Ed25519(Ed25519Key),
}

impl KeyPair {
    /// Generate a fresh random key pair.
    pub fn generate(scheme: SignatureScheme) -> Self {
        Self::from_inner(match scheme {
            SignatureScheme::EcdsaSecp256k1Sha256 => Inner::Secp256k1(Secp256k1Key::generate()),
            SignatureScheme::EddsaEd25519 => Inner::Ed25519(Ed25519Key::generate()),
        })
    }

    /// Deterministic key pair from a 32-byte seed. Fails only for a seed
    /// that is not a valid secp256k1 scalar.
    pub fn from_seed(scheme: SignatureScheme, seed: [u8; 32]) -> Result<Self, CryptoError> {
        Ok(Self::from_inner(match scheme {
            SignatureScheme::EcdsaSecp256k1Sha256 => {
                Inner::Secp256k1(Secp256k1Key::from_seed(seed)?)
            }
            SignatureScheme::EddsaEd25519 => Inner::Ed25519(Ed25519Key::from_seed(seed)),
        }))
    }

    fn from_inner(inner: Inner) -> Self {
        let public = match &inner {
            Inner::Secp256k1(key) => key.public_key(),
            Inner::Ed25519(key) => key.public_key(),
        };
        Self { inner, public }
    }

    /// Scheme of this key pair.
    pub fn scheme(&self) -> SignatureScheme {
        self.public.scheme()
    }

    /// Public half as a handle.
    pub fn public_key(&self) -> PublicKeyHandle {
        self.public
    }

    /// Sign `message`, returning the raw 64-byte signature.
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        match &self.inner {
            Inner::Secp256k1(key) => key.sign(message),
            Inner::Ed25519(key) => key.sign(message),
        }
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &self.public)
            .finish_non_exhaustive()
    }
}

/// Verify `signature` over `message` under `key`.
pub fn verify(key: &PublicKeyHandle, message: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
    match key {
        PublicKeyHandle::Secp256k1(point) => ecdsa::verify(point, message, signature),
        PublicKeyHandle::Ed25519(point) => ed25519::verify(point, message, signature),
    }
}

/// Check that `key` is a usable point for its scheme.
pub fn validate_public_key(key: &PublicKeyHandle) -> Result<(), CryptoError> {
    match key {
        PublicKeyHandle::Secp256k1(point) => ecdsa::check_point(point),
        PublicKeyHandle::Ed25519(point) => ed25519::check_point(point),
    }
}
