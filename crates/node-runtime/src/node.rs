//! # Node
//!
//! Runtime context of one ledger participant. Created when the node starts
//! and owned by whoever runs it; nothing in here is process-global.
//!
//! ## Initialization Order
//!
//! 1. Key pair and identity
//! 2. Event bus
//! 3. Vault (store + service) publishing on the bus
//! 4. Service hub: binder, notary client, ledger adapter, transport
//! 5. Flow router, registered with the network

use crate::adapters::VaultLedgerAdapter;
use crate::config::NodeConfig;
use lf_01_signature_binding::SignatureBinder;
use lf_02_flow_engine::{
    FlowHandle, FlowLogic, FlowRouter, InMemoryNetwork, NotaryClient, ServiceHub,
};
use lf_04_vault::{InMemoryVaultStore, VaultService};
use shared_bus::{EventTopic, InMemoryEventBus};
use shared_crypto::KeyPair;
use shared_types::{Party, PartyName, SignatureScheme};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::info;

/// A running node.
#[derive(Debug)]
pub struct Node {
    identity: Party,
    bus: Arc<InMemoryEventBus>,
    vault: Arc<VaultService>,
    router: Arc<FlowRouter>,
    network: Arc<InMemoryNetwork>,
}

impl Node {
    /// Start a node called `name` on `network`, using `notary` for
    /// uniqueness. The node is reachable as soon as this returns.
    pub fn start(
        name: PartyName,
        config: &NodeConfig,
        network: Arc<InMemoryNetwork>,
        notary: Arc<dyn NotaryClient>,
    ) -> Self {
        let key = KeyPair::generate(SignatureScheme::EcdsaSecp256k1Sha256);
        let identity = Party::new(name, key.public_key());

        let bus = Arc::new(InMemoryEventBus::with_capacity(config.vault.event_capacity));
        let vault = Arc::new(VaultService::new(
            Arc::new(InMemoryVaultStore::new()),
            Arc::clone(&bus),
            BTreeSet::from([identity.owning_key]),
        ));

        let hub = ServiceHub {
            identity: identity.clone(),
            key: Arc::new(key),
            binder: SignatureBinder::new(config.platform_version),
            notary,
            ledger: Arc::new(VaultLedgerAdapter::new(Arc::clone(&vault))),
            transport: network.clone(),
            bus: Arc::clone(&bus),
            config: config.flow.clone(),
        };
        let router = Arc::new(FlowRouter::new(hub));
        network.register(&router);

        info!(node = %identity, "Node started");
        Self {
            identity,
            bus,
            vault,
            router,
            network,
        }
    }

    pub fn identity(&self) -> &Party {
        &self.identity
    }

    pub fn router(&self) -> &Arc<FlowRouter> {
        &self.router
    }

    pub fn hub(&self) -> &Arc<ServiceHub> {
        self.router.hub()
    }

    pub fn vault(&self) -> &Arc<VaultService> {
        &self.vault
    }

    /// The node's event bus (vault updates and flow lifecycle).
    pub fn bus(&self) -> &Arc<InMemoryEventBus> {
        &self.bus
    }

    /// Run `logic` as a new initiating flow on this node.
    pub fn start_flow<F: FlowLogic>(&self, logic: F) -> FlowHandle<F::Output> {
        self.router.start_flow(logic)
    }

    /// Leave the network. Flows already running finish on their own;
    /// new sessions to this node fail with `NoCounterpartyRegistered`.
    pub fn shutdown(self) {
        self.network.deregister(&self.identity.name);
        for protocol in self.router.registered_protocols() {
            self.router.deregister_responder(&protocol);
        }
        info!(
            node = %self.identity,
            flows_started = self.router.flows_started(),
            in_flight = self.router.flows_in_flight(),
            vault_updates = self.bus.published(EventTopic::Vault),
            "Node stopped"
        );
    }
}
