//! # Domain Layer
//!
//! The cash contract, issuance requests and the issuance policy.

pub mod cash;
pub mod errors;
pub mod policy;
pub mod request;
