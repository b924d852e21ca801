//! Ed25519 keys, the default for notaries.
//!
//! Verification is strict (RFC 8032 with canonical `R` and no small-order
//! keys), so one message has exactly one accepted signature per key.

use crate::CryptoError;
use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use shared_types::PublicKeyHandle;
use zeroize::Zeroize;

pub(crate) struct Ed25519Key {
    signing: SigningKey,
}

impl Ed25519Key {
    pub(crate) fn generate() -> Self {
        Self {
            signing: SigningKey::generate(&mut rand::thread_rng()),
        }
    }

    pub(crate) fn from_seed(mut seed: [u8; 32]) -> Self {
        let signing = SigningKey::from_bytes(&seed);
        seed.zeroize();
        Self { signing }
    }

    pub(crate) fn public_key(&self) -> PublicKeyHandle {
        PublicKeyHandle::Ed25519(self.signing.verifying_key().to_bytes())
    }

    pub(crate) fn sign(&self, message: &[u8]) -> Vec<u8> {
        self.signing.sign(message).to_bytes().to_vec()
    }
}

fn verifying_key(key: &[u8; 32]) -> Result<VerifyingKey, CryptoError> {
    let key = VerifyingKey::from_bytes(key).map_err(|_| CryptoError::InvalidPublicKey)?;
    if key.is_weak() {
        return Err(CryptoError::InvalidPublicKey);
    }
    Ok(key)
}

pub(crate) fn check_point(key: &[u8; 32]) -> Result<(), CryptoError> {
    verifying_key(key).map(|_| ())
}

pub(crate) fn verify(key: &[u8; 32], message: &[u8], signature: &[u8]) -> Result<(), CryptoError> {
    let signature = Signature::from_slice(signature).map_err(|_| CryptoError::InvalidSignatureFormat {
        expected: Signature::BYTE_SIZE,
        actual: signature.len(),
    })?;
    verifying_key(key)?
        .verify_strict(message, &signature)
        .map_err(|_| CryptoError::SignatureVerificationFailed)
}
