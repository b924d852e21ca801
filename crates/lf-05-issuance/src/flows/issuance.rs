//! # Issuance Protocol
//!
//! ```text
//! Requester                         Issuer
//!     │ ──── IssuanceRequest ────→    │ policy check (reject → Business)
//!     │                               │ issue to self, notarise, record
//!     │                               │ move to requester, notarise, record
//!     │ ←──── SignedTransaction ───   │
//!     │ verify, record                │
//! ```
//!
//! When the cash is for the issuer itself, the issue transaction is the
//! one sent back and no move happens.

use crate::domain::cash::{self, CashState};
use crate::domain::errors::IssuanceError;
use crate::domain::policy::IssuancePolicy;
use crate::domain::request::{IssuanceRequest, IssuanceResult};
use async_trait::async_trait;
use lf_02_flow_engine::{
    FlowContext, FlowError, FlowLogic, FlowSession, SignedTransaction, TransactionBuilder,
};
use shared_types::{Party, ProtocolId};
use std::sync::Arc;
use tracing::info;

pub const ISSUANCE_PROTOCOL: &str = "issuance.v1";

/// Initiator: asks `issuer` for cash.
#[derive(Clone, Debug)]
pub struct IssuanceRequester {
    pub request: IssuanceRequest,
    pub issuer: Party,
}

impl IssuanceRequester {
    pub fn new(request: IssuanceRequest, issuer: Party) -> Self {
        Self { request, issuer }
    }
}

#[async_trait]
impl FlowLogic for IssuanceRequester {
    type Output = IssuanceResult;

    fn protocol(&self) -> ProtocolId {
        ProtocolId::new(ISSUANCE_PROTOCOL)
    }

    async fn call(self, ctx: &mut FlowContext) -> Result<IssuanceResult, FlowError> {
        let mut session = ctx.initiate(&self.issuer).await?;
        ctx.begin_building()?;
        session.send(&self.request).await?;

        let expected = self.request.clone();
        let stx = ctx
            .receive_finalised_checked(&mut session, move |stx| delivers(stx, &expected))
            .await?;
        Ok(IssuanceResult {
            stx,
            recipient: self.request.issue_to,
        })
    }
}

/// The transaction must hand the requested amount to the requested owner.
fn delivers(stx: &SignedTransaction, request: &IssuanceRequest) -> Result<(), FlowError> {
    if stx.wire().notary != request.notary {
        return Err(FlowError::protocol("issuer used a different notary than requested"));
    }
    let delivered = cash::cash_outputs(&stx.wire().outputs)
        .into_iter()
        .any(|c| c.amount == request.amount && c.owner == request.issue_to.owning_key);
    if delivered {
        Ok(())
    } else {
        Err(FlowError::protocol("issuer sent a transaction that does not deliver the request"))
    }
}

/// Responder: validates, issues and delivers.
pub struct Issuer {
    session: FlowSession,
    policy: Arc<IssuancePolicy>,
}

impl Issuer {
    pub fn new(session: FlowSession, policy: Arc<IssuancePolicy>) -> Self {
        Self { session, policy }
    }
}

#[async_trait]
impl FlowLogic for Issuer {
    type Output = SignedTransaction;

    fn protocol(&self) -> ProtocolId {
        ProtocolId::new(ISSUANCE_PROTOCOL)
    }

    async fn call(self, ctx: &mut FlowContext) -> Result<SignedTransaction, FlowError> {
        let Issuer { mut session, policy } = self;
        ctx.begin_building()?;

        let request: IssuanceRequest = session.receive().await?;
        policy.validate(&request, ctx.notary_identity())?;

        let me = ctx.our_identity().clone();
        let mut builder = TransactionBuilder::new(request.notary.clone());
        cash::generate_issue(
            &mut builder,
            request.amount,
            me.reference(request.issuer_reference.clone()),
            me.owning_key,
        )?;
        let staged = ctx.sign(&builder)?;
        let signed = ctx.verify_signatures(staged)?;
        let notarised = ctx.notarise(signed).await?;
        let issued = ctx.record(notarised).await?;
        info!(tx_id = %issued.id().short(), amount = %request.amount, "Issued cash");

        let delivered = if request.issue_to.owning_key == me.owning_key {
            issued
        } else {
            let output = issued
                .wire()
                .out_refs(issued.id())
                .into_iter()
                .next()
                .ok_or_else(|| IssuanceError::MalformedState("issue has no output".into()))?;
            let mut builder = TransactionBuilder::new(request.notary.clone());
            let moved: CashState =
                cash::generate_move(&mut builder, output, request.issue_to.owning_key)?;
            let staged = ctx.sign(&builder)?;
            let signed = ctx.verify_signatures(staged)?;
            let notarised = ctx.notarise(signed).await?;
            let transfer = ctx.record(notarised).await?;
            info!(tx_id = %transfer.id().short(), to = %request.issue_to, amount = %moved.amount, "Moved issued cash");
            transfer
        };

        ctx.send_finalised(&session, &delivered).await?;
        Ok(delivered)
    }
}
