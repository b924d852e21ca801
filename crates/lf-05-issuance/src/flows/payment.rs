//! # Cash Payment Protocol
//!
//! Moves one caller-selected cash state to a recipient. The state is
//! taken as given; if another transaction spends it first, the notary
//! rejects this one with a conflict.

use crate::domain::cash::{self, CashState};
use crate::domain::errors::IssuanceError;
use async_trait::async_trait;
use lf_02_flow_engine::{
    FlowContext, FlowError, FlowLogic, FlowSession, SignedTransaction, TransactionBuilder,
};
use shared_types::{Party, ProtocolId, StateAndRef};

pub const PAYMENT_PROTOCOL: &str = "cash.payment.v1";

/// Initiator: pays `input` to `recipient`.
#[derive(Clone, Debug)]
pub struct CashPaymentFlow {
    pub input: StateAndRef,
    pub recipient: Party,
}

impl CashPaymentFlow {
    pub fn new(input: StateAndRef, recipient: Party) -> Self {
        Self { input, recipient }
    }
}

#[async_trait]
impl FlowLogic for CashPaymentFlow {
    type Output = SignedTransaction;

    fn protocol(&self) -> ProtocolId {
        ProtocolId::new(PAYMENT_PROTOCOL)
    }

    async fn call(self, ctx: &mut FlowContext) -> Result<SignedTransaction, FlowError> {
        let cash = CashState::from_state(&self.input.state)?;
        if cash.owner != ctx.our_identity().owning_key {
            return Err(IssuanceError::NotOwner.into());
        }

        let session = ctx.initiate(&self.recipient).await?;
        let mut builder = TransactionBuilder::new(self.input.state.notary.clone());
        cash::generate_move(&mut builder, self.input, self.recipient.owning_key)?;

        let staged = ctx.sign(&builder)?;
        let signed = ctx.verify_signatures(staged)?;
        let notarised = ctx.notarise(signed).await?;
        let stx = ctx.record(notarised).await?;
        ctx.send_finalised(&session, &stx).await?;
        Ok(stx)
    }
}

/// Responder: records the payment.
pub struct CashPaymentReceiver {
    session: FlowSession,
}

impl CashPaymentReceiver {
    pub fn new(session: FlowSession) -> Self {
        Self { session }
    }
}

#[async_trait]
impl FlowLogic for CashPaymentReceiver {
    type Output = SignedTransaction;

    fn protocol(&self) -> ProtocolId {
        ProtocolId::new(PAYMENT_PROTOCOL)
    }

    async fn call(mut self, ctx: &mut FlowContext) -> Result<SignedTransaction, FlowError> {
        ctx.receive_finalised(&mut self.session).await
    }
}
