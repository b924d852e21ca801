//! # Issuance Subsystem (LF-05)
//!
//! Cash issuance and payment protocols built on the flow engine.
//!
//! - **Domain Layer** (`domain/`): cash contract, requests, issuance policy
//! - **Flows** (`flows/`): `IssuanceRequester`/`Issuer` and
//!   `CashPaymentFlow`/`CashPaymentReceiver`
//! - **Service Layer** (`service.rs`): responder registration
//!
//! The issuer's policy check runs before anything is built or signed, so a
//! rejected request leaves no trace on any ledger.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod domain;
pub mod flows;
pub mod service;

// Re-export public API
pub use domain::cash::{CashState, CASH_CONTRACT, ISSUE_COMMAND, MOVE_COMMAND};
pub use domain::errors::IssuanceError;
pub use domain::policy::IssuancePolicy;
pub use domain::request::{IssuanceRequest, IssuanceResult};
pub use flows::{
    CashPaymentFlow, CashPaymentReceiver, IssuanceRequester, Issuer, ISSUANCE_PROTOCOL,
    PAYMENT_PROTOCOL,
};
pub use service::{register_issuer, register_payment_receiver};
