//! # Domain Layer
//!
//! Flow states, errors and the transaction type-state. No I/O.

pub mod config;
pub mod errors;
pub mod state;
pub mod transaction;
