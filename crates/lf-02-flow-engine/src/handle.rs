//! # Completion Handles
//!
//! A [`FlowHandle`] resolves to the instance's typed result. Awaiting,
//! polling or dropping it never affects the instance: a dropped handle
//! only means nobody reads the result. The one way to end an instance
//! early is [`FlowHandle::cancel`], honoured only before signing.

use crate::domain::errors::FlowError;
use crate::domain::state::{FlowControl, FlowState};
use shared_types::{FlowId, ProtocolId};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::{mpsc, oneshot, watch};

/// Awaitable result of one flow instance.
#[derive(Debug)]
pub struct FlowHandle<T> {
    id: FlowId,
    protocol: ProtocolId,
    state: watch::Receiver<FlowState>,
    control: Arc<FlowControl>,
    result: oneshot::Receiver<Result<T, FlowError>>,
}

impl<T> FlowHandle<T> {
    pub(crate) fn new(
        id: FlowId,
        protocol: ProtocolId,
        state: watch::Receiver<FlowState>,
        control: Arc<FlowControl>,
        result: oneshot::Receiver<Result<T, FlowError>>,
    ) -> Self {
        Self {
            id,
            protocol,
            state,
            control,
            result,
        }
    }

    pub fn id(&self) -> FlowId {
        self.id
    }

    pub fn protocol(&self) -> &ProtocolId {
        &self.protocol
    }

    /// Latest observed state.
    pub fn state(&self) -> FlowState {
        *self.state.borrow()
    }

    /// Wait until the instance reaches `target` or a terminal state, and
    /// return the state reached.
    pub async fn wait_for(&mut self, target: FlowState) -> FlowState {
        let reached = self
            .state
            .wait_for(|state| *state == target || state.is_terminal())
            .await
            .map(|state| *state);
        reached.unwrap_or_else(|_| *self.state.borrow())
    }

    /// Stop the instance before it signs anything.
    ///
    /// Granted in `Created`, `AwaitingCounterparty` and `BuildingTransaction`
    /// when no transaction was signed yet; the instance then fails with a
    /// protocol error and its peers are told. Otherwise `CancelRefused` and
    /// the instance carries on.
    pub fn cancel(&self) -> Result<(), FlowError> {
        self.control.request_cancel()
    }
}

impl<T> Future for FlowHandle<T> {
    type Output = Result<T, FlowError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        Pin::new(&mut this.result).poll(cx).map(|received| {
            received.unwrap_or_else(|_| Err(FlowError::protocol("flow ended without a result")))
        })
    }
}

/// Handles of the responder instances created for one registered protocol,
/// in the order their sessions arrived.
#[derive(Debug)]
pub struct InitiatedFlows<T> {
    receiver: mpsc::UnboundedReceiver<FlowHandle<T>>,
}

impl<T> InitiatedFlows<T> {
    pub(crate) fn new(receiver: mpsc::UnboundedReceiver<FlowHandle<T>>) -> Self {
        Self { receiver }
    }

    /// Next responder instance. `None` once the router is gone.
    pub async fn next(&mut self) -> Option<FlowHandle<T>> {
        self.receiver.recv().await
    }

    /// Next responder instance if one was already created.
    pub fn try_next(&mut self) -> Option<FlowHandle<T>> {
        self.receiver.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::state::FlowStateMachine;

    fn handle() -> (
        FlowHandle<u32>,
        FlowStateMachine,
        oneshot::Sender<Result<u32, FlowError>>,
    ) {
        let id = FlowId::random();
        let (machine, state_rx) = FlowStateMachine::new(id);
        let (result_tx, result_rx) = oneshot::channel();
        let handle = FlowHandle::new(
            id,
            ProtocolId::new("t"),
            state_rx,
            machine.control(),
            result_rx,
        );
        (handle, machine, result_tx)
    }

    #[tokio::test]
    async fn test_resolves_to_result() {
        let (handle, _state, result) = handle();
        result.send(Ok(42)).unwrap();
        assert_eq!(handle.await, Ok(42));
    }

    #[tokio::test]
    async fn test_lost_result_is_protocol_error() {
        let (handle, _state, result) = handle();
        drop(result);
        assert!(matches!(handle.await, Err(FlowError::Protocol(_))));
    }

    #[tokio::test]
    async fn test_wait_for_stops_at_terminal() {
        let (mut handle, mut machine, _result) = handle();
        machine.advance(FlowState::Failed).unwrap();
        assert_eq!(handle.wait_for(FlowState::AwaitingNotary).await, FlowState::Failed);
        assert_eq!(handle.state(), FlowState::Failed);
    }

    #[test]
    fn test_cancel_only_before_signatures() {
        let (handle, mut machine, _result) = handle();
        machine.advance(FlowState::BuildingTransaction).unwrap();
        machine.advance(FlowState::AwaitingSignatures).unwrap();

        assert_eq!(
            handle.cancel(),
            Err(FlowError::CancelRefused {
                state: FlowState::AwaitingSignatures
            })
        );
        assert!(machine.advance(FlowState::AwaitingNotary).is_ok());
    }
}
