//! ECDSA over secp256k1, message digested with SHA-256.
//!
//! Public keys travel as 33-byte compressed points inside
//! [`PublicKeyHandle::Secp256k1`]. Signatures are 64-byte `r || s`,
//! low-S normalised; RFC 6979 nonces.

use crate::CryptoError;
use k256::ecdsa::signature::{Signer, Verifier};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use shared_types::PublicKeyHandle;
use zeroize::Zeroize;

pub(crate) struct Secp256k1Key {
    signing: SigningKey,
}

impl Secp256k1Key {
    pub(crate) fn generate() -> Self {
        Self {
            signing: SigningKey::random(&mut rand::thread_rng()),
        }
    }

    /// The seed is scrubbed whether or not it is a valid scalar.
    pub(crate) fn from_seed(mut seed: [u8; 32]) -> Result<Self, CryptoError> {
        let signing = SigningKey::from_slice(&seed).map_err(|_| CryptoError::InvalidPrivateKey);
        seed.zeroize();
        Ok(Self { signing: signing? })
    }

    pub(crate) fn public_key(&self) -> PublicKeyHandle {
        let point = self.signing.verifying_key().to_encoded_point(true);
        let mut compressed = [0u8; 33];
        compressed.copy_from_slice(point.as_bytes());
        PublicKeyHandle::Secp256k1(compressed)
    }

    pub(crate) fn sign(&self, message: &[u8]) -> Vec<u8> {
        let signature: Signature = self.signing.sign(message);
        signature.to_bytes().to_vec()
    }
}

fn verifying_key(key: &[u8; 33]) -> Result<VerifyingKey, CryptoError> {
    VerifyingKey::from_sec1_bytes(key).map_err(|_| CryptoError::InvalidPublicKey)
}

pub(crate) fn check_point(key: &[u8; 33]) -> Result<(), CryptoError> {
    verifying_key(key).map(|_| ())
}

pub(crate) fn verify(key: &[u8; 33], message: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
    let signature = Signature::from_slice(signature).map_err(|_| {
        if signature.len() == 64 {
            CryptoError::InvalidSignature
        } else {
            CryptoError::InvalidSignatureFormat {
                expected: 64,
                actual: signature.len(),
            }
        }
    })?;
    // Only the low-S form is accepted.
    if signature.normalize_s().is_some() {
        return Err(CryptoError::InvalidSignature);
    }
    verifying_key(key)?
        .verify(message, &signature)
        .map_err(|_| CryptoError::SignatureVerificationFailed)
}
