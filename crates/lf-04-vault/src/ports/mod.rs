//! Ports layer for the vault.

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
