//! Adapters implementing this crate's outbound ports.

pub mod in_memory;

pub use in_memory::InMemoryNetwork;
