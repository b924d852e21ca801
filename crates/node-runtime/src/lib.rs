//! # Node Runtime Library
//!
//! Builds and runs ledger nodes. The `ledger-node` binary is a thin
//! wrapper; tests drive the same types directly.
//!
//! - `config` - `NodeConfig`, defaults and `LF_*` environment overrides
//! - `logging` - global `tracing` subscriber
//! - `node` - one participant: identity, vault, router, service hub
//! - `network` - in-process network with a shared notary
//! - `adapters` - flow engine ports over the notary and vault subsystems

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod adapters;
pub mod config;
pub mod logging;
pub mod network;
pub mod node;

pub use adapters::{NotaryClientAdapter, VaultLedgerAdapter};
pub use config::{ConfigError, IssuanceConfig, LoggingConfig, NodeConfig, VaultConfig};
pub use logging::init_logging;
pub use network::{MockNetwork, NOTARY_NAME};
pub use node::Node;
