//! Adapters for the notary's outbound ports.

pub mod memory;

pub use memory::InMemoryUniquenessProvider;
