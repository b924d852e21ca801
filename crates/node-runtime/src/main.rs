//! # Ledger Node
//!
//! Starts an in-memory network with a notary, a bank and a client, then
//! has the client request an issuance of cash from the bank.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (defaults + `LF_*` environment)
//! 2. Validate it
//! 3. Install logging
//! 4. Start notary and party nodes; register the bank as issuer
//! 5. Run one issuance and report the vault contents

use anyhow::{Context, Result};
use lf_04_vault::VaultApi;
use lf_05_issuance::{register_issuer, CashState, IssuanceRequest, IssuanceRequester};
use node_runtime::{init_logging, MockNetwork, NodeConfig};
use shared_types::{Amount, OpaqueBytes};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = NodeConfig::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    init_logging(&config.logging)?;

    info!("===========================================");
    info!("  Ledger Node v{}", env!("CARGO_PKG_VERSION"));
    info!("  Platform version: {}", config.platform_version);
    info!("===========================================");

    let network = MockNetwork::new(config);
    let bank = network.create_party_node("Bank");
    let client = network.create_party_node("Client");
    let _issued = register_issuer(bank.router(), network.issuance_policy());

    let request = IssuanceRequest {
        amount: Amount::dollars(100),
        issue_to: client.identity().clone(),
        issuer_reference: OpaqueBytes::of(1),
        notary: network.notary_identity().clone(),
    };
    let result = client
        .start_flow(IssuanceRequester::new(request, bank.identity().clone()))
        .await
        .context("Issuance failed")?;

    info!(
        tx_id = %result.stx.id(),
        recipient = %result.recipient,
        "Issuance complete"
    );
    for state in client.vault().current_states().await {
        if let Ok(cash) = CashState::from_state(&state.state) {
            info!(state_ref = %state.state_ref, amount = %cash.amount, "Client holds cash");
        }
    }
    info!(
        submissions = network.notary().submissions(),
        commits = network.notary().commits(),
        "Notary statistics"
    );

    client.shutdown();
    bank.shutdown();
    Ok(())
}
