//! # Signature Binding Subsystem (LF-01)
//!
//! Metadata-bound transaction signatures.
//!
//! ## Architecture
//!
//! This subsystem follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): MetaData codec and signing logic, no I/O
//! - **Ports Layer** (`ports/`): Trait definitions for inbound/outbound interfaces
//! - **Service Layer** (`service.rs`): Wires domain logic to ports
//!
//! ## Binding
//!
//! A party never signs raw transaction bytes. It signs a `MetaData` record
//! naming the transaction's content root, its own public key and its
//! platform version, and ships the record with the signature. Verifiers
//! check the signature over the record, then check the record names the
//! root and key they expect.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use domain::binder::{
    check_self_consistent, sign, verify_against, verify_all, verify_self_consistent,
    VerificationReport,
};
pub use domain::codec::{decode, encode, LAYOUT_V1};
pub use domain::errors::{BindingError, DecodeError};
pub use domain::metadata::{ExtraMetaData, MetaData, TransactionSignature};
pub use ports::inbound::SignatureBindingApi;
pub use ports::outbound::{FixedTimeSource, SystemTimeSource, TimeSource};
pub use service::SignatureBinder;
