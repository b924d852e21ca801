//! Flow logic for the issuance and payment protocols.

pub mod issuance;
pub mod payment;

pub use issuance::{IssuanceRequester, Issuer, ISSUANCE_PROTOCOL};
pub use payment::{CashPaymentFlow, CashPaymentReceiver, PAYMENT_PROTOCOL};
