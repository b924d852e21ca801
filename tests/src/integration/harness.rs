//! Shared fixtures: a network with a notary, an issuing bank and a client.

use lf_02_flow_engine::{InitiatedFlows, SignedTransaction};
use lf_05_issuance::{register_issuer, IssuanceRequest, IssuanceRequester, IssuanceResult};
use node_runtime::{MockNetwork, Node, NodeConfig};
use shared_bus::{EventFilter, EventTopic, LedgerEvent, Subscription};
use shared_types::{Amount, OpaqueBytes, Party, VaultUpdate};
use std::time::Duration;

/// Longest any single scenario step may take.
pub const STEP_TIMEOUT: Duration = Duration::from_secs(10);

pub struct TestNetwork {
    pub network: MockNetwork,
    pub bank: Node,
    pub client: Node,
    /// Issuer instances created on the bank.
    pub issued: InitiatedFlows<SignedTransaction>,
}

impl TestNetwork {
    pub fn new() -> Self {
        Self::with_config(NodeConfig::default())
    }

    pub fn with_config(mut config: NodeConfig) -> Self {
        config.flow.session_timeout = Duration::from_secs(5);
        config.flow.notary_timeout = Duration::from_secs(5);

        let network = MockNetwork::new(config);
        let bank = network.create_party_node("Bank");
        let client = network.create_party_node("Client");
        let issued = register_issuer(bank.router(), network.issuance_policy());
        Self {
            network,
            bank,
            client,
            issued,
        }
    }

    /// Issuance request for `amount` delivered to `to`.
    pub fn request(&self, amount: Amount, to: &Party) -> IssuanceRequest {
        IssuanceRequest {
            amount,
            issue_to: to.clone(),
            issuer_reference: OpaqueBytes::of(1),
            notary: self.network.notary_identity().clone(),
        }
    }

    /// Run one issuance from `requester`'s node, bank as issuer.
    pub async fn issue(
        &self,
        requester: &Node,
        amount: Amount,
        to: &Party,
    ) -> Result<IssuanceResult, lf_02_flow_engine::FlowError> {
        let flow = IssuanceRequester::new(self.request(amount, to), self.bank.identity().clone());
        tokio::time::timeout(STEP_TIMEOUT, requester.start_flow(flow))
            .await
            .expect("issuance timed out")
    }
}

/// Subscription to `node`'s vault updates.
pub fn vault_events(node: &Node) -> Subscription {
    node.bus()
        .subscribe(EventFilter::topics(vec![EventTopic::Vault]))
}

/// Vault updates already delivered to `subscription`.
pub fn drain_updates(subscription: &mut Subscription) -> Vec<VaultUpdate> {
    let mut updates = Vec::new();
    while let Ok(Some(event)) = subscription.try_recv() {
        if let LedgerEvent::VaultUpdated(update) = event {
            updates.push(update);
        }
    }
    updates
}

/// Next vault update, waiting at most `STEP_TIMEOUT`.
pub async fn next_update(subscription: &mut Subscription) -> VaultUpdate {
    loop {
        let event = tokio::time::timeout(STEP_TIMEOUT, subscription.recv())
            .await
            .expect("no vault update in time")
            .expect("bus closed");
        if let LedgerEvent::VaultUpdated(update) = event {
            return update;
        }
    }
}
