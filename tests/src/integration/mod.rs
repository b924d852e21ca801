//! Cross-subsystem scenarios run on an in-process network.

#[cfg(test)]
mod harness;

pub mod conflict;
pub mod forgery;
pub mod issuance;
pub mod load;
pub mod vault_stream;
