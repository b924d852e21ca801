//! # Domain Layer
//!
//! Pure encoding and signing logic with no I/O dependencies.
//! This is the inner layer of the hexagonal architecture.

pub mod binder;
pub mod codec;
pub mod errors;
pub mod metadata;
