//! # Notary Subsystem (LF-03)
//!
//! The network's only strong-consistency point: of any set of transactions
//! consuming the same state, the notary accepts at most one.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): consumed-state bookkeeping, verdicts
//! - **Ports Layer** (`ports/`): `NotaryApi` inbound, `UniquenessProvider` outbound
//! - **Service Layer** (`service.rs`): commits, signs and counts
//! - **Adapters** (`adapters/`): in-memory provider

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use adapters::InMemoryUniquenessProvider;
pub use domain::consumed::{CommitOutcome, ConsumedStates};
pub use domain::errors::{NotaryError, UniquenessConflict};
pub use domain::verdict::{NotarisationRequest, NotaryVerdict};
pub use ports::inbound::NotaryApi;
pub use ports::outbound::UniquenessProvider;
pub use service::NotaryService;
