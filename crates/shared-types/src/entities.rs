//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Hashing**: `SecureHash`, `ContentRoot`
//! - **Identity**: `PublicKeyHandle`, `PartyName`, `Party`, `PartyAndReference`
//! - **Protocol**: `FlowId`, `ProtocolId`, `SessionId`

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use sha2::{Digest, Sha256};
use std::fmt;
use uuid::Uuid;

// =============================================================================
// CLUSTER A: HASHING
// =============================================================================

/// A 32-byte SHA-256 hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct SecureHash(pub [u8; 32]);

/// Hash identifying the canonical content of a transaction (its Merkle root).
pub type ContentRoot = SecureHash;

impl SecureHash {
    /// The all-zero hash, used to pad Merkle trees.
    pub const ZERO: SecureHash = SecureHash([0u8; 32]);

    /// Hash arbitrary bytes.
    pub fn sha256(data: &[u8]) -> Self {
        Self(Sha256::digest(data).into())
    }

    /// Hash of `self || other`.
    pub fn concat(&self, other: &SecureHash) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(self.0);
        hasher.update(other.0);
        Self(hasher.finalize().into())
    }

    /// Merkle root over the given leaves.
    ///
    /// Leaves are padded with `ZERO` to the next power of two. An empty
    /// leaf set has root `ZERO`.
    pub fn merkle_root(leaves: &[SecureHash]) -> Self {
        if leaves.is_empty() {
            return Self::ZERO;
        }
        let mut level: Vec<SecureHash> = leaves.to_vec();
        level.resize(leaves.len().next_power_of_two(), Self::ZERO);
        while level.len() > 1 {
            level = level
                .chunks(2)
                .map(|pair| pair[0].concat(&pair[1]))
                .collect();
        }
        level[0]
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lower-case hex of the full hash.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// First 12 hex characters, for log output.
    pub fn short(&self) -> String {
        let mut s = self.to_hex();
        s.truncate(12);
        s
    }
}

impl fmt::Display for SecureHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode_upper(self.0))
    }
}

impl fmt::Debug for SecureHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecureHash({})", self.short())
    }
}

// =============================================================================
// CLUSTER B: IDENTITY
// =============================================================================

/// Signature scheme a public key belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SignatureScheme {
    /// ECDSA over secp256k1 with SHA-256 message digests.
    EcdsaSecp256k1Sha256,
    /// EdDSA over Ed25519 (SHA-512 internally).
    EddsaEd25519,
}

/// Scheme-tagged public key bytes.
///
/// Equality, ordering and hashing are structural over scheme and bytes.
#[serde_as]
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PublicKeyHandle {
    /// Compressed SEC1 secp256k1 point (33 bytes).
    Secp256k1(#[serde_as(as = "Bytes")] [u8; 33]),
    /// Ed25519 point (32 bytes).
    Ed25519(#[serde_as(as = "Bytes")] [u8; 32]),
}

impl PublicKeyHandle {
    /// The scheme this key belongs to.
    pub fn scheme(&self) -> SignatureScheme {
        match self {
            Self::Secp256k1(_) => SignatureScheme::EcdsaSecp256k1Sha256,
            Self::Ed25519(_) => SignatureScheme::EddsaEd25519,
        }
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Secp256k1(bytes) => bytes,
            Self::Ed25519(bytes) => bytes,
        }
    }

    /// SHA-256 of the scheme-tagged key, stable across encodings.
    pub fn fingerprint(&self) -> SecureHash {
        let tag: u8 = match self.scheme() {
            SignatureScheme::EcdsaSecp256k1Sha256 => 1,
            SignatureScheme::EddsaEd25519 => 2,
        };
        let mut data = Vec::with_capacity(34);
        data.push(tag);
        data.extend_from_slice(self.as_bytes());
        SecureHash::sha256(&data)
    }
}

impl fmt::Debug for PublicKeyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self.scheme(), self.fingerprint().short())
    }
}

impl fmt::Display for PublicKeyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fingerprint().short())
    }
}

/// Legal name of a node on the network, e.g. `O=Bank of Ledger,L=London,C=GB`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PartyName(pub String);

impl PartyName {
    /// Create a party name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PartyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A well-known network identity: a name bound to a signing key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Party {
    /// The legal name.
    pub name: PartyName,
    /// The key this party signs with.
    pub owning_key: PublicKeyHandle,
}

impl Party {
    /// Create a party.
    pub fn new(name: PartyName, owning_key: PublicKeyHandle) -> Self {
        Self { name, owning_key }
    }

    /// Attach a reference to this party.
    pub fn reference(&self, reference: OpaqueBytes) -> PartyAndReference {
        PartyAndReference {
            party: self.clone(),
            reference,
        }
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Opaque byte payload (references, contract data).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct OpaqueBytes(pub Vec<u8>);

impl OpaqueBytes {
    /// Wrap a single byte, the common reference form.
    pub fn of(byte: u8) -> Self {
        Self(vec![byte])
    }

    /// Raw bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

/// A party plus a party-chosen reference (e.g. an issuance reference).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PartyAndReference {
    /// The party.
    pub party: Party,
    /// The reference bytes.
    pub reference: OpaqueBytes,
}

// =============================================================================
// CLUSTER C: PROTOCOL
// =============================================================================

/// Unique identifier of a flow instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FlowId(pub Uuid);

impl FlowId {
    /// Fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for FlowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier of a session between two flow instances.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Name of a business protocol, e.g. `issuance.v1`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProtocolId(pub String);

impl ProtocolId {
    /// Create a protocol identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl fmt::Display for ProtocolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which side of a session a flow instance plays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlowRole {
    /// Opened the session.
    Initiator,
    /// Created by the router for an inbound session.
    Responder,
}

impl fmt::Display for FlowRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initiator => f.write_str("initiator"),
            Self::Responder => f.write_str("responder"),
        }
    }
}
