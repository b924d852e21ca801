//! Adapters for the vault's outbound ports.

pub mod memory;

pub use memory::InMemoryVaultStore;
