//! # Error Types
//!
//! Defines error types used across subsystems.

use thiserror::Error;

/// Errors from the canonical encoding layer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EncodingError {
    /// A value could not be encoded (size limit exceeded).
    #[error("Encoding failed: {0}")]
    Encode(String),

    /// Bytes did not decode to the requested type.
    #[error("Decoding failed: {0}")]
    Decode(String),
}

/// Errors constructing a currency.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CurrencyError {
    /// Code is not three upper-case ASCII letters.
    #[error("Invalid currency code: {0:?}")]
    InvalidCode(String),
}
