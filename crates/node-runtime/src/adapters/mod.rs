//! # Runtime Adapters
//!
//! Implement the flow engine's outbound ports over the notary and vault
//! subsystems.

pub mod notary;
pub mod vault;

pub use notary::NotaryClientAdapter;
pub use vault::VaultLedgerAdapter;
