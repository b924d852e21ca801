//! # Flow Engine (LF-02)
//!
//! Runs business protocols as suspendable flow instances.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): state machine, errors, type-state transactions
//! - **Ports Layer** (`ports/`): `FlowLogic` inbound; notary, ledger and
//!   session transport outbound
//! - **Service Layer** (`service.rs`): `FlowRouter`, which spawns instances
//!   and maps inbound sessions to responders
//! - **Adapters** (`adapters/`): in-process session transport
//!
//! ## Instances
//!
//! Each instance is one tokio task owning its [`FlowContext`] and its
//! session ends. Instances never share mutable state; two sides of a
//! protocol talk only through their session. An instance always runs to
//! `Completed` or `Failed`, whatever happens to its [`FlowHandle`].

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod adapters;
pub mod context;
pub mod domain;
pub mod handle;
pub mod ports;
pub mod service;
pub mod session;

#[cfg(test)]
mod testing;

// Re-export public API
pub use adapters::InMemoryNetwork;
pub use context::{FlowContext, ServiceHub};
pub use domain::config::FlowConfig;
pub use domain::errors::{FlowError, RemoteFailure};
pub use domain::state::{FlowState, FlowStateMachine};
pub use domain::transaction::{
    CollectingSignatures, FullySigned, Notarised, SignedTransaction, StagedTransaction,
    TransactionBuilder,
};
pub use handle::{FlowHandle, InitiatedFlows};
pub use ports::inbound::FlowLogic;
pub use ports::outbound::{
    LedgerError, LedgerPort, NotaryClient, NotaryClientError, NotaryResponse, SessionTransport,
};
pub use service::FlowRouter;
pub use session::{FlowSession, SessionMessage};
