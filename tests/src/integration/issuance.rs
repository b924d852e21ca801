//! # Issuance Integration Tests
//!
//! Client asks the bank to issue cash, end to end through sessions, the
//! notary and both vaults.
//!
//! ```text
//! Client (IssuanceRequester)          Bank (Issuer)              Notary
//!   │ ── IssuanceRequest ──────────────→ │
//!   │                                    │ validate (policy)
//!   │                                    │ issue to self ──────────→ │ accept
//!   │                                    │ move to client ─────────→ │ accept
//!   │ ←───────────── finalised move ──── │
//!   │ verify + record
//! ```

#[cfg(test)]
mod tests {
    use crate::integration::harness::{drain_updates, vault_events, TestNetwork, STEP_TIMEOUT};
    use lf_02_flow_engine::{FlowError, FlowState};
    use lf_04_vault::VaultApi;
    use lf_05_issuance::CashState;
    use shared_bus::{EventFilter, EventTopic, FlowOutcome, LedgerEvent};
    use shared_types::{Amount, Currency};

    #[tokio::test]
    async fn test_issuer_delivers_to_requester() {
        let mut net = TestNetwork::new();
        let mut bank_updates = vault_events(&net.bank);
        let mut client_updates = vault_events(&net.client);

        let result = net
            .issue(&net.client, Amount::dollars(100), net.client.identity())
            .await
            .unwrap();
        assert_eq!(&result.recipient, net.client.identity());

        // The issuer instance finished with the same transaction.
        let issuer = tokio::time::timeout(STEP_TIMEOUT, net.issued.next())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(issuer.await.unwrap(), result.stx);

        // Bank: the issue produced one state, the move consumed it.
        let bank = drain_updates(&mut bank_updates);
        assert_eq!(bank.len(), 2);
        assert_eq!((bank[0].consumed.len(), bank[0].produced.len()), (0, 1));
        assert_eq!((bank[1].consumed.len(), bank[1].produced.len()), (1, 0));
        assert_eq!(bank[1].consumed, bank[0].produced);
        assert!(net.bank.vault().current_states().await.is_empty());

        // Client: one update, one state produced by the delivered transaction.
        let client = drain_updates(&mut client_updates);
        assert_eq!(client.len(), 1);
        assert_eq!(client[0].tx_id, result.stx.id());
        assert!(client[0].consumed.is_empty());
        assert_eq!(client[0].produced.len(), 1);

        let cash = CashState::from_state(&client[0].produced[0].state).unwrap();
        assert_eq!(cash.amount, Amount::dollars(100));
        assert_eq!(cash.owner, net.client.identity().owning_key);
        assert_eq!(&cash.issuer.party, net.bank.identity());

        assert_eq!(net.network.notary().commits(), 2);
    }

    #[tokio::test]
    async fn test_self_issuance_emits_one_update() {
        let net = TestNetwork::new();
        let mut bank_updates = vault_events(&net.bank);

        let result = net
            .issue(&net.bank, Amount::dollars(5), net.bank.identity())
            .await
            .unwrap();

        let updates = drain_updates(&mut bank_updates);
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].tx_id, result.stx.id());
        assert!(updates[0].consumed.is_empty());
        assert_eq!(updates[0].produced.len(), 1);
        assert_eq!(net.bank.vault().current_states().await, updates[0].produced);

        // Only the issue itself went to the notary.
        assert_eq!(net.network.notary().submissions(), 1);
    }

    #[tokio::test]
    async fn test_disallowed_currency_rejected_before_any_effect() {
        let mut net = TestNetwork::new();
        let mut bank_updates = vault_events(&net.bank);
        let mut client_updates = vault_events(&net.client);
        let mut bank_flows = net
            .bank
            .bus()
            .subscribe(EventFilter::topics(vec![EventTopic::Flows]));

        let yen = Amount::from_major(1_000, Currency::JPY);
        let result = net.issue(&net.client, yen, net.client.identity()).await;
        assert!(matches!(result, Err(FlowError::Business(ref msg)) if msg.contains("JPY")));

        let mut issuer = tokio::time::timeout(STEP_TIMEOUT, net.issued.next())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(issuer.wait_for(FlowState::Completed).await, FlowState::Failed);
        assert!(matches!(issuer.await, Err(FlowError::Business(_))));

        assert_eq!(net.network.notary().submissions(), 0);
        assert!(drain_updates(&mut bank_updates).is_empty());
        assert!(drain_updates(&mut client_updates).is_empty());
        assert!(net.client.vault().current_states().await.is_empty());

        let mut outcomes = Vec::new();
        while let Ok(Some(event)) = bank_flows.try_recv() {
            if let LedgerEvent::FlowFinished { outcome, .. } = event {
                outcomes.push(outcome);
            }
        }
        assert!(matches!(outcomes.as_slice(), [FlowOutcome::Failed { .. }]));
    }

    #[tokio::test]
    async fn test_zero_amount_rejected() {
        let net = TestNetwork::new();
        let result = net
            .issue(&net.client, Amount::dollars(0), net.client.identity())
            .await;
        assert!(matches!(result, Err(FlowError::Business(_))));
        assert_eq!(net.network.notary().submissions(), 0);
    }

    #[tokio::test]
    async fn test_issuer_offline_is_no_counterparty() {
        let net = TestNetwork::new();
        let TestNetwork {
            network,
            bank,
            client,
            issued: _issued,
        } = net;
        let bank_identity = bank.identity().clone();
        bank.shutdown();

        let flow = lf_05_issuance::IssuanceRequester::new(
            lf_05_issuance::IssuanceRequest {
                amount: Amount::dollars(1),
                issue_to: client.identity().clone(),
                issuer_reference: shared_types::OpaqueBytes::of(1),
                notary: network.notary_identity().clone(),
            },
            bank_identity,
        );
        let result = tokio::time::timeout(STEP_TIMEOUT, client.start_flow(flow))
            .await
            .unwrap();
        assert!(matches!(
            result,
            Err(FlowError::NoCounterpartyRegistered { party, .. }) if party.as_str() == "Bank"
        ));
    }
}
