//! In-process session transport.
//!
//! Connects routers living in the same process. Each `open_session` builds
//! a fresh channel pair and hands the far end to the target router, which
//! spawns a responder instance for it before the near end is returned.

use crate::domain::errors::FlowError;
use crate::ports::outbound::SessionTransport;
use crate::service::FlowRouter;
use crate::session::FlowSession;
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{Party, PartyName, ProtocolId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing::debug;

/// Directory of reachable nodes plus session settings.
///
/// Holds routers weakly: a node that shuts down becomes unreachable
/// without deregistering.
#[derive(Debug)]
pub struct InMemoryNetwork {
    nodes: RwLock<HashMap<PartyName, Weak<FlowRouter>>>,
    buffer: usize,
    timeout: Duration,
    sessions_opened: AtomicU64,
}

impl InMemoryNetwork {
    /// Network whose sessions buffer `buffer` messages per direction and
    /// time out after `timeout`.
    pub fn new(buffer: usize, timeout: Duration) -> Self {
        Self {
            nodes: RwLock::new(HashMap::new()),
            buffer,
            timeout,
            sessions_opened: AtomicU64::new(0),
        }
    }

    /// Make `router` reachable under its node's name.
    pub fn register(&self, router: &Arc<FlowRouter>) {
        let name = router.hub().identity.name.clone();
        debug!(node = %name, "Node joined network");
        self.nodes.write().insert(name, Arc::downgrade(router));
    }

    pub fn deregister(&self, name: &PartyName) -> bool {
        self.nodes.write().remove(name).is_some()
    }

    /// Names of nodes currently reachable.
    pub fn nodes(&self) -> Vec<PartyName> {
        let mut names: Vec<PartyName> = self
            .nodes
            .read()
            .iter()
            .filter(|(_, router)| router.strong_count() > 0)
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    pub fn sessions_opened(&self) -> u64 {
        self.sessions_opened.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl SessionTransport for InMemoryNetwork {
    async fn open_session(
        &self,
        initiator: &Party,
        counterparty: &Party,
        protocol: &ProtocolId,
    ) -> Result<FlowSession, FlowError> {
        let router = self
            .nodes
            .read()
            .get(&counterparty.name)
            .and_then(Weak::upgrade)
            .ok_or_else(|| FlowError::NoCounterpartyRegistered {
                party: counterparty.name.clone(),
                protocol: protocol.clone(),
            })?;

        let (ours, theirs) = FlowSession::pair(
            initiator.clone(),
            counterparty.clone(),
            protocol.clone(),
            self.buffer,
            self.timeout,
        );
        router.accept_session(protocol, theirs)?;
        self.sessions_opened.fetch_add(1, Ordering::Relaxed);
        Ok(ours)
    }
}
