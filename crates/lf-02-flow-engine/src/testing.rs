//! Hub construction for unit tests.

use crate::adapters::in_memory::InMemoryNetwork;
use crate::context::ServiceHub;
use crate::domain::config::FlowConfig;
use crate::ports::outbound::{LedgerPort, NotaryClient};
use lf_01_signature_binding::SignatureBinder;
use shared_bus::InMemoryEventBus;
use shared_crypto::KeyPair;
use shared_types::{Party, PartyName, SignatureScheme};
use std::sync::Arc;
use std::time::Duration;

/// Hub for `name` reachable through `network`.
pub fn hub_on(
    network: Arc<InMemoryNetwork>,
    name: &str,
    notary: Arc<dyn NotaryClient>,
    ledger: Arc<dyn LedgerPort>,
) -> ServiceHub {
    let key = KeyPair::generate(SignatureScheme::EcdsaSecp256k1Sha256);
    ServiceHub {
        identity: Party::new(PartyName::new(name), key.public_key()),
        key: Arc::new(key),
        binder: SignatureBinder::new(1),
        notary,
        ledger,
        transport: network,
        bus: Arc::new(InMemoryEventBus::new()),
        config: FlowConfig::default(),
    }
}

/// Hub on a private network of its own.
pub fn hub_with(
    name: &str,
    notary: Arc<dyn NotaryClient>,
    ledger: Arc<dyn LedgerPort>,
) -> Arc<ServiceHub> {
    let network = Arc::new(InMemoryNetwork::new(8, Duration::from_secs(5)));
    Arc::new(hub_on(network, name, notary, ledger))
}
