//! # Vault Update Stream Tests
//!
//! Per-node delivery of vault updates: no replay for late subscribers,
//! completion order for every subscriber, and snapshot-plus-stream
//! tracking.

#[cfg(test)]
mod tests {
    use crate::integration::harness::{drain_updates, next_update, vault_events, TestNetwork};
    use lf_04_vault::{StateQuery, VaultApi};
    use lf_05_issuance::CASH_CONTRACT;
    use shared_types::{Amount, ContractId};

    #[tokio::test]
    async fn test_late_subscriber_sees_only_later_updates() {
        let net = TestNetwork::new();
        let first = net
            .issue(&net.client, Amount::dollars(1), net.client.identity())
            .await
            .unwrap();

        let mut late = vault_events(&net.client);
        let second = net
            .issue(&net.client, Amount::dollars(2), net.client.identity())
            .await
            .unwrap();

        let seen = drain_updates(&mut late);
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].tx_id, second.stx.id());
        assert_ne!(seen[0].tx_id, first.stx.id());
    }

    #[tokio::test]
    async fn test_subscribers_share_completion_order() {
        let net = TestNetwork::new();
        let mut a = vault_events(&net.client);
        let mut b = vault_events(&net.client);

        let mut expected = Vec::new();
        for amount in 1..=4 {
            let result = net
                .issue(&net.client, Amount::dollars(amount), net.client.identity())
                .await
                .unwrap();
            expected.push(result.stx.id());
        }

        let order = |updates: Vec<shared_types::VaultUpdate>| -> Vec<_> {
            updates.into_iter().map(|u| u.tx_id).collect()
        };
        assert_eq!(order(drain_updates(&mut a)), expected);
        assert_eq!(order(drain_updates(&mut b)), expected);
    }

    #[tokio::test]
    async fn test_track_replays_snapshot_then_streams() {
        let net = TestNetwork::new();
        net.issue(&net.client, Amount::dollars(10), net.client.identity())
            .await
            .unwrap();

        let mut track = net
            .client
            .vault()
            .track(&StateQuery::contract(ContractId::new(CASH_CONTRACT)))
            .await;
        assert_eq!(track.snapshot.len(), 1);

        let next = net
            .issue(&net.client, Amount::dollars(20), net.client.identity())
            .await
            .unwrap();
        let update = next_update(&mut track.updates).await;
        assert_eq!(update.tx_id, next.stx.id());
        assert!(track
            .snapshot
            .iter()
            .all(|s| !update.produced_refs().contains(&s.state_ref)));

        let cash = net
            .client
            .vault()
            .states_by_contract(&ContractId::new(CASH_CONTRACT))
            .await;
        assert_eq!(cash.len(), 2);
    }

    #[tokio::test]
    async fn test_nodes_have_separate_streams() {
        let net = TestNetwork::new();
        let mut bank = vault_events(&net.bank);
        let mut client = vault_events(&net.client);

        net.issue(&net.bank, Amount::dollars(3), net.bank.identity())
            .await
            .unwrap();

        assert_eq!(drain_updates(&mut bank).len(), 1);
        assert!(drain_updates(&mut client).is_empty());
    }
}
