//! # Flow Router
//!
//! Application service that starts flow instances.
//!
//! ## Architecture
//!
//! - Outbound: `start_flow` spawns an initiator instance on the runtime and
//!   returns its handle at once.
//! - Inbound: `accept_session` maps the session's protocol to a registered
//!   responder factory and spawns a fresh responder instance owning that
//!   session. One session, one instance.
//!
//! Instances run detached and end only by reaching `Completed` or
//! `Failed`. A cancellation granted through the handle drops the logic at
//! its current suspension point and fails the instance.

use crate::context::{FlowContext, ServiceHub};
use crate::domain::errors::FlowError;
use crate::domain::state::{FlowStateMachine, CANCELLED};
use crate::handle::{FlowHandle, InitiatedFlows};
use crate::ports::inbound::FlowLogic;
use crate::session::{FlowSession, SessionMessage};
use parking_lot::RwLock;
use shared_bus::{EventPublisher, FlowOutcome, LedgerEvent};
use shared_types::{FlowId, FlowRole, ProtocolId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, info_span, warn, Instrument};

type ResponderSpawner = Arc<dyn Fn(FlowSession) + Send + Sync>;

#[derive(Debug, Default)]
struct RouterStats {
    started: AtomicU64,
    in_flight: AtomicUsize,
}

/// Per-node flow router.
pub struct FlowRouter {
    hub: Arc<ServiceHub>,
    responders: RwLock<HashMap<ProtocolId, ResponderSpawner>>,
    stats: Arc<RouterStats>,
}

impl FlowRouter {
    pub fn new(hub: ServiceHub) -> Self {
        Self {
            hub: Arc::new(hub),
            responders: RwLock::new(HashMap::new()),
            stats: Arc::new(RouterStats::default()),
        }
    }

    pub fn hub(&self) -> &Arc<ServiceHub> {
        &self.hub
    }

    /// Start an initiator instance. Must be called inside a tokio runtime.
    pub fn start_flow<F: FlowLogic>(&self, logic: F) -> FlowHandle<F::Output> {
        spawn_instance(&self.hub, &self.stats, FlowRole::Initiator, logic, None)
    }

    /// Register the responder for `protocol`, replacing any previous one.
    ///
    /// `factory` builds the responder logic for each inbound session; the
    /// returned receiver yields a handle per instance created.
    pub fn register_responder<R, F>(&self, protocol: ProtocolId, factory: F) -> InitiatedFlows<R::Output>
    where
        R: FlowLogic,
        F: Fn(FlowSession) -> R + Send + Sync + 'static,
    {
        let (initiated, receiver) = mpsc::unbounded_channel();
        let hub = Arc::clone(&self.hub);
        let stats = Arc::clone(&self.stats);

        let spawner: ResponderSpawner = Arc::new(move |session: FlowSession| {
            let peer = session.failure_notifier();
            let logic = factory(session);
            let handle = spawn_instance(&hub, &stats, FlowRole::Responder, logic, Some(peer));
            // Nobody listening is fine; the instance still runs.
            let _ = initiated.send(handle);
        });

        if self.responders.write().insert(protocol.clone(), spawner).is_some() {
            warn!(%protocol, "Replaced existing responder");
        }
        debug!(node = %self.hub.identity, %protocol, "Responder registered");
        InitiatedFlows::new(receiver)
    }

    /// Remove the responder for `protocol`.
    pub fn deregister_responder(&self, protocol: &ProtocolId) -> bool {
        self.responders.write().remove(protocol).is_some()
    }

    /// Hand an inbound session to a fresh responder instance.
    pub fn accept_session(&self, protocol: &ProtocolId, session: FlowSession) -> Result<(), FlowError> {
        let spawner = self.responders.read().get(protocol).cloned();
        match spawner {
            Some(spawn) => {
                debug!(
                    node = %self.hub.identity,
                    %protocol,
                    session_id = %session.id(),
                    from = %session.counterparty(),
                    "Accepted session"
                );
                spawn(session);
                Ok(())
            }
            None => Err(FlowError::NoCounterpartyRegistered {
                party: self.hub.identity.name.clone(),
                protocol: protocol.clone(),
            }),
        }
    }

    pub fn registered_protocols(&self) -> Vec<ProtocolId> {
        let mut protocols: Vec<ProtocolId> = self.responders.read().keys().cloned().collect();
        protocols.sort();
        protocols
    }

    /// Instances started since creation, both roles.
    pub fn flows_started(&self) -> u64 {
        self.stats.started.load(Ordering::Relaxed)
    }

    /// Instances not yet terminal.
    pub fn flows_in_flight(&self) -> usize {
        self.stats.in_flight.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for FlowRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowRouter")
            .field("node", &self.hub.identity.name)
            .field("protocols", &self.registered_protocols())
            .finish_non_exhaustive()
    }
}

fn spawn_instance<F: FlowLogic>(
    hub: &Arc<ServiceHub>,
    stats: &Arc<RouterStats>,
    role: FlowRole,
    logic: F,
    peer: Option<mpsc::Sender<SessionMessage>>,
) -> FlowHandle<F::Output> {
    let id = FlowId::random();
    let protocol = logic.protocol();
    let (machine, state) = FlowStateMachine::new(id);
    let control = machine.control();
    let (result_tx, result_rx) = oneshot::channel();

    let mut ctx = FlowContext::new(id, role, protocol.clone(), machine, Arc::clone(hub));
    if let Some(peer) = peer {
        ctx.add_peer(peer);
    }

    let span = info_span!(
        "flow",
        flow_id = %id,
        protocol = %protocol,
        role = %role,
        node = %hub.identity.name,
    );
    let hub = Arc::clone(hub);
    let stats = Arc::clone(stats);
    stats.started.fetch_add(1, Ordering::Relaxed);
    stats.in_flight.fetch_add(1, Ordering::Relaxed);

    let task_protocol = protocol.clone();
    let cancel = Arc::clone(&control);
    tokio::spawn(
        async move {
            hub.bus
                .publish(LedgerEvent::FlowStarted {
                    flow_id: id,
                    protocol: task_protocol.clone(),
                    role,
                })
                .await;
            info!("Flow started");

            let result = tokio::select! {
                result = logic.call(&mut ctx) => result,
                () = cancel.cancelled() => {
                    info!("Flow cancelled by its handle");
                    Err(FlowError::protocol(CANCELLED))
                }
            };
            let result = ctx.finish(result);

            let outcome = match &result {
                Ok(_) => {
                    info!("Flow completed");
                    FlowOutcome::Completed
                }
                Err(error) => {
                    warn!(%error, "Flow failed");
                    FlowOutcome::Failed {
                        reason: error.to_string(),
                    }
                }
            };
            drop(ctx);
            stats.in_flight.fetch_sub(1, Ordering::Relaxed);

            hub.bus
                .publish(LedgerEvent::FlowFinished {
                    flow_id: id,
                    protocol: task_protocol,
                    role,
                    outcome,
                })
                .await;
            if result_tx.send(result).is_err() {
                debug!("Completion handle dropped before the flow finished");
            }
        }
        .instrument(span),
    );

    FlowHandle::new(id, protocol, state, control, result_rx)
}
