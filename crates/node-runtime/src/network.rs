//! # Mock Network
//!
//! A whole ledger network in one process: an in-memory session transport,
//! a single notary every node shares, and any number of party nodes.

use crate::adapters::NotaryClientAdapter;
use crate::config::NodeConfig;
use crate::node::Node;
use lf_01_signature_binding::SignatureBinder;
use lf_02_flow_engine::{InMemoryNetwork, NotaryClient};
use lf_03_notary::{InMemoryUniquenessProvider, NotaryApi, NotaryService};
use lf_05_issuance::IssuancePolicy;
use shared_crypto::KeyPair;
use shared_types::{Party, PartyName, SignatureScheme};
use std::sync::Arc;
use tracing::info;

/// Name the network's notary runs under.
pub const NOTARY_NAME: &str = "Notary";

/// In-process network of nodes sharing one notary.
#[derive(Debug)]
pub struct MockNetwork {
    config: NodeConfig,
    transport: Arc<InMemoryNetwork>,
    notary: Arc<NotaryService>,
}

impl MockNetwork {
    /// Network whose nodes all run with `config`.
    pub fn new(config: NodeConfig) -> Self {
        let transport = Arc::new(InMemoryNetwork::new(
            config.flow.session_buffer,
            config.flow.session_timeout,
        ));
        let notary = Arc::new(NotaryService::new(
            PartyName::new(NOTARY_NAME),
            KeyPair::generate(SignatureScheme::EddsaEd25519),
            SignatureBinder::new(config.platform_version),
            Arc::new(InMemoryUniquenessProvider::new()),
        ));
        info!(notary = %notary.identity(), "Network notary started");

        Self {
            config,
            transport,
            notary,
        }
    }

    /// Start a party node reachable on this network.
    pub fn create_party_node(&self, name: &str) -> Node {
        let client: Arc<dyn NotaryClient> = Arc::new(NotaryClientAdapter::new(self.notary.clone()));
        Node::start(
            PartyName::new(name),
            &self.config,
            Arc::clone(&self.transport),
            client,
        )
    }

    pub fn notary(&self) -> &Arc<NotaryService> {
        &self.notary
    }

    pub fn notary_identity(&self) -> &Party {
        self.notary.identity()
    }

    /// Issuance policy built from the configured allow-list.
    pub fn issuance_policy(&self) -> IssuancePolicy {
        IssuancePolicy::new(self.config.issuance.allowed_currencies.iter().copied())
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn transport(&self) -> &Arc<InMemoryNetwork> {
        &self.transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lf_02_flow_engine::{FlowError, SessionTransport};
    use shared_types::ProtocolId;

    #[tokio::test]
    async fn test_nodes_join_and_leave() {
        let network = MockNetwork::new(NodeConfig::default());
        let bank = network.create_party_node("Bank");
        let client = network.create_party_node("Client");

        assert_eq!(
            network.transport().nodes(),
            vec![PartyName::new("Bank"), PartyName::new("Client")]
        );
        assert_eq!(bank.hub().notary.identity(), network.notary_identity());
        assert_ne!(bank.identity().owning_key, client.identity().owning_key);

        let bank_identity = bank.identity().clone();
        bank.shutdown();
        assert_eq!(network.transport().nodes(), vec![PartyName::new("Client")]);

        let result = network
            .transport()
            .open_session(client.identity(), &bank_identity, &ProtocolId::new("issuance.v1"))
            .await;
        assert!(matches!(result, Err(FlowError::NoCounterpartyRegistered { .. })));
    }

    #[test]
    fn test_policy_follows_config() {
        let mut config = NodeConfig::default();
        config.issuance.allowed_currencies = vec![shared_types::Currency::JPY];
        let network = MockNetwork::new(config);
        assert_eq!(
            network.issuance_policy().allowed_currencies().len(),
            1
        );
    }
}
