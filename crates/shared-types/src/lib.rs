//! # Shared Types Crate
//!
//! This crate contains the ledger data model shared by every subsystem and
//! the canonical encoding those values are hashed and signed under.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Content Addressing**: A transaction's identity is the Merkle root over
//!   its canonically encoded components; nothing else names it.
//! - **Immutable Values**: States, transactions and vault deltas are never
//!   mutated after construction; changes produce new values.

pub mod codec;
pub mod currency;
pub mod entities;
pub mod errors;
pub mod ledger;

pub use codec::{canonical_bytes, from_canonical_bytes, MAX_ENCODED_BYTES};
pub use currency::{Amount, Currency};
pub use entities::*;
pub use errors::*;
pub use ledger::*;
