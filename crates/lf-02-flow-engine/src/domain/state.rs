//! # Flow State Machine
//!
//! ```text
//! [Created] ──initiate──→ [AwaitingCounterparty] ──exchange──→ [BuildingTransaction]
//!     │                                                          │   ↑       │
//!     └───────────── responder ──────────────────────────────────┘   │       │
//!                                                                    │    sign
//!                                      next transaction ─────────────┘       ↓
//! [Completed] ←──record── [Finalizing] ←──accept── [AwaitingNotary] ←── [AwaitingSignatures]
//!
//! Any non-terminal state ──error──→ [Failed]
//! ```
//!
//! `BuildingTransaction` may also go straight to `Finalizing` (receiving a
//! finalised transaction) or to `Completed` (a flow that produced nothing).
//! `Completed` and `Failed` have no exits.
//!
//! An instance may be cancelled through its handle only while it is still
//! in `Created`, `AwaitingCounterparty` or `BuildingTransaction`, and only
//! if it has never produced a signature. The check and the transitions
//! share one lock, so a granted cancellation always wins over signing.

use crate::domain::errors::FlowError;
use parking_lot::Mutex;
use shared_types::FlowId;
use std::fmt;
use std::sync::Arc;
use tokio::sync::{watch, Notify};
use tracing::{debug, info};

/// Error message of an instance ended by its handle.
pub(crate) const CANCELLED: &str = "flow cancelled";

/// Protocol state of a flow instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowState {
    Created,
    AwaitingCounterparty,
    BuildingTransaction,
    AwaitingSignatures,
    AwaitingNotary,
    Finalizing,
    Completed,
    Failed,
}

impl FlowState {
    /// `Completed` or `Failed`.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// States a handle may cancel from.
    pub fn is_cancellable(self) -> bool {
        matches!(
            self,
            Self::Created | Self::AwaitingCounterparty | Self::BuildingTransaction
        )
    }

    /// Whether `self → to` is an edge of the state machine.
    pub fn can_transition_to(self, to: FlowState) -> bool {
        use FlowState::*;

        if self.is_terminal() {
            return false;
        }
        if to == Failed {
            return true;
        }
        matches!(
            (self, to),
            (Created, AwaitingCounterparty)
                | (Created, BuildingTransaction)
                | (AwaitingCounterparty, BuildingTransaction)
                | (BuildingTransaction, AwaitingSignatures)
                | (BuildingTransaction, Finalizing)
                | (BuildingTransaction, Completed)
                | (AwaitingSignatures, AwaitingNotary)
                | (AwaitingNotary, Finalizing)
                | (Finalizing, Completed)
                | (Finalizing, BuildingTransaction)
        )
    }
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug)]
struct Phase {
    state: FlowState,
    /// Sticky once the instance left the cancellable states.
    signing: bool,
    cancel_requested: bool,
}

/// State of one instance plus any cancellation request, shared between the
/// instance and its handle.
#[derive(Debug)]
pub(crate) struct FlowControl {
    phase: Mutex<Phase>,
    cancelled: Notify,
}

impl FlowControl {
    fn new() -> Self {
        Self {
            phase: Mutex::new(Phase {
                state: FlowState::Created,
                signing: false,
                cancel_requested: false,
            }),
            cancelled: Notify::new(),
        }
    }

    /// Grant a cancellation unless the instance already signed or ended.
    pub(crate) fn request_cancel(&self) -> Result<(), FlowError> {
        let mut phase = self.phase.lock();
        if phase.signing || phase.state.is_terminal() {
            return Err(FlowError::CancelRefused { state: phase.state });
        }
        phase.cancel_requested = true;
        drop(phase);
        self.cancelled.notify_one();
        Ok(())
    }

    /// Resolves once a cancellation was granted.
    pub(crate) async fn cancelled(&self) {
        self.cancelled.notified().await;
    }
}

/// Current state of one instance, observable through a watch channel.
///
/// Owned by the instance's own task; only it advances the state.
#[derive(Debug)]
pub struct FlowStateMachine {
    flow_id: FlowId,
    control: Arc<FlowControl>,
    watch: watch::Sender<FlowState>,
}

impl FlowStateMachine {
    /// New machine in `Created`, plus a receiver for observers.
    pub fn new(flow_id: FlowId) -> (Self, watch::Receiver<FlowState>) {
        let (watch, receiver) = watch::channel(FlowState::Created);
        (
            Self {
                flow_id,
                control: Arc::new(FlowControl::new()),
                watch,
            },
            receiver,
        )
    }

    pub fn current(&self) -> FlowState {
        self.control.phase.lock().state
    }

    pub(crate) fn control(&self) -> Arc<FlowControl> {
        Arc::clone(&self.control)
    }

    /// Move to `to`, or fail with `InvalidTransition`. Once cancelled, only
    /// `Failed` is reachable.
    pub fn advance(&mut self, to: FlowState) -> Result<(), FlowError> {
        let mut phase = self.control.phase.lock();
        let from = phase.state;
        if !from.can_transition_to(to) {
            return Err(FlowError::InvalidTransition { from, to });
        }
        if phase.cancel_requested && to != FlowState::Failed {
            info!(flow_id = %self.flow_id, %from, %to, "Transition refused, flow cancelled");
            return Err(FlowError::protocol(CANCELLED));
        }
        if !to.is_cancellable() {
            phase.signing = true;
        }
        phase.state = to;
        drop(phase);

        debug!(flow_id = %self.flow_id, %from, %to, "Flow state transition");
        self.watch.send_replace(to);
        Ok(())
    }

    /// Move to `to` unless already there.
    pub fn ensure(&mut self, to: FlowState) -> Result<(), FlowError> {
        if self.current() == to {
            return Ok(());
        }
        self.advance(to)
    }
}
