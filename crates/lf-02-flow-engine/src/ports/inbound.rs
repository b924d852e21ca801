//! Inbound (Driving) ports for the flow engine.

use crate::context::FlowContext;
use crate::domain::errors::FlowError;
use async_trait::async_trait;
use shared_types::ProtocolId;

/// One side of a business protocol.
///
/// `call` runs inside the instance's own task and is the only code that
/// touches the instance's state. It suspends only at session, signature
/// and notary I/O performed through `ctx`.
#[async_trait]
pub trait FlowLogic: Send + Sized + 'static {
    /// Value the completion handle resolves to.
    type Output: Send + 'static;

    /// Protocol this logic speaks.
    fn protocol(&self) -> ProtocolId;

    /// Run the protocol to its end.
    async fn call(self, ctx: &mut FlowContext) -> Result<Self::Output, FlowError>;
}
