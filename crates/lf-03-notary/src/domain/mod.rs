//! # Domain Layer
//!
//! Consumption bookkeeping and verdicts. No I/O.

pub mod consumed;
pub mod errors;
pub mod verdict;
