//! Responder registration for a node offering these protocols.

use crate::domain::policy::IssuancePolicy;
use crate::flows::issuance::{Issuer, ISSUANCE_PROTOCOL};
use crate::flows::payment::{CashPaymentReceiver, PAYMENT_PROTOCOL};
use lf_02_flow_engine::{FlowRouter, InitiatedFlows, SignedTransaction};
use shared_types::ProtocolId;
use std::sync::Arc;

/// Make `router`'s node an issuer under `policy`.
pub fn register_issuer(
    router: &FlowRouter,
    policy: IssuancePolicy,
) -> InitiatedFlows<SignedTransaction> {
    let policy = Arc::new(policy);
    router.register_responder(ProtocolId::new(ISSUANCE_PROTOCOL), move |session| {
        Issuer::new(session, Arc::clone(&policy))
    })
}

/// Let `router`'s node receive cash payments.
pub fn register_payment_receiver(router: &FlowRouter) -> InitiatedFlows<SignedTransaction> {
    router.register_responder(ProtocolId::new(PAYMENT_PROTOCOL), CashPaymentReceiver::new)
}
