//! # Vault Subsystem (LF-04)
//!
//! A node's live states and its vault update stream.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): relevant-delta computation, queries
//! - **Ports Layer** (`ports/`): `VaultApi` inbound, `VaultStore` outbound
//! - **Service Layer** (`service.rs`): serialised apply-and-publish
//! - **Adapters** (`adapters/`): in-memory store
//!
//! Every recorded transaction that changes the vault produces exactly one
//! [`shared_bus::LedgerEvent::VaultUpdated`], published after the store
//! mutation. Late subscribers see only later updates; `track` pairs a
//! subscription with a snapshot instead.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use adapters::InMemoryVaultStore;
pub use domain::delta::relevant_delta;
pub use domain::errors::VaultError;
pub use domain::query::StateQuery;
pub use ports::inbound::{VaultApi, VaultTrack};
pub use ports::outbound::VaultStore;
pub use service::VaultService;
