//! # Ledger Flows Test Suite
//!
//! Unified test crate for scenarios spanning several subsystems.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── harness.rs       # MockNetwork with a bank and a client
//!     ├── issuance.rs      # issuer, self-issuance, business rejection
//!     ├── conflict.rs      # double spends across concurrent flows
//!     ├── load.rs          # many concurrent issuances
//!     └── vault_stream.rs  # vault update delivery
//! tests/benches/
//! └── binding_benchmarks.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p lf-tests
//! cargo test -p lf-tests integration::conflict
//! cargo bench -p lf-tests
//! ```

pub mod integration;
