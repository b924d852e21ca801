//! # Domain Layer
//!
//! Delta computation and state queries. No I/O.

pub mod delta;
pub mod errors;
pub mod query;
