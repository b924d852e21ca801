//! Ports layer for the notary.

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
