//! Ports layer for the flow engine.
//!
//! - Inbound (Driving) ports: the contract flow logic implements
//! - Outbound (Driven) ports: notary, ledger and session transport

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
