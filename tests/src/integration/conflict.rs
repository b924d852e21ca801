//! # Double-Spend Tests
//!
//! Two payment flows race to spend the same cash state. The notary lets
//! exactly one through; the loser fails with a conflict and leaves no
//! trace in any vault.

#[cfg(test)]
mod tests {
    use crate::integration::harness::{
        drain_updates, next_update, vault_events, TestNetwork, STEP_TIMEOUT,
    };
    use lf_02_flow_engine::{FlowError, FlowState};
    use lf_04_vault::VaultApi;
    use lf_05_issuance::{register_payment_receiver, CashPaymentFlow};
    use shared_types::{Amount, StateRef};
    use std::collections::HashSet;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_spends_have_one_winner() {
        let net = TestNetwork::new();
        let other = net.network.create_party_node("Other");
        let mut client_payments = register_payment_receiver(net.client.router());
        let mut other_payments = register_payment_receiver(other.router());

        let issued = net
            .issue(&net.bank, Amount::dollars(50), net.bank.identity())
            .await
            .unwrap();
        let input = issued.stx.wire().out_refs(issued.stx.id()).remove(0);
        let mut bank_updates = vault_events(&net.bank);

        let mut to_client = net
            .bank
            .start_flow(CashPaymentFlow::new(input.clone(), net.client.identity().clone()));
        let mut to_other = net
            .bank
            .start_flow(CashPaymentFlow::new(input.clone(), other.identity().clone()));

        let (a, b) = tokio::join!(
            to_client.wait_for(FlowState::Completed),
            to_other.wait_for(FlowState::Completed)
        );
        assert!(
            matches!(
                (a, b),
                (FlowState::Completed, FlowState::Failed) | (FlowState::Failed, FlowState::Completed)
            ),
            "terminal states {a:?} and {b:?}"
        );

        let (a, b) = tokio::time::timeout(STEP_TIMEOUT, async { tokio::join!(to_client, to_other) })
            .await
            .unwrap();
        let (winner, loser) = match (a, b) {
            (Ok(stx), Err(e)) | (Err(e), Ok(stx)) => (stx, e),
            other => panic!("expected one winner, got {other:?}"),
        };
        assert_eq!(
            loser,
            FlowError::Conflict {
                conflicts: vec![input.state_ref]
            }
        );
        assert_eq!(winner.wire().inputs, vec![input.state_ref]);
        assert_eq!(net.network.notary().rejections(), 1);

        // The bank consumed the input exactly once.
        let updates = drain_updates(&mut bank_updates);
        let consumed: Vec<StateRef> = updates
            .iter()
            .flat_map(|u| u.consumed_refs())
            .collect();
        assert_eq!(consumed, vec![input.state_ref]);
        assert!(net.bank.vault().current_states().await.is_empty());

        // Both receivers ran; exactly one recorded the cash.
        let received = tokio::time::timeout(STEP_TIMEOUT, async {
            let client = client_payments.next().await.unwrap().await;
            let other = other_payments.next().await.unwrap().await;
            (client, other)
        })
        .await
        .unwrap();
        assert!(matches!(
            received,
            (Ok(_), Err(FlowError::Conflict { .. })) | (Err(FlowError::Conflict { .. }), Ok(_))
        ));
        let holders = net.client.vault().current_states().await.len()
            + other.vault().current_states().await.len();
        assert_eq!(holders, 1);
    }

    #[tokio::test]
    async fn test_spent_state_cannot_be_spent_again() {
        let net = TestNetwork::new();
        let _client_payments = register_payment_receiver(net.client.router());

        let issued = net
            .issue(&net.bank, Amount::dollars(10), net.bank.identity())
            .await
            .unwrap();
        let input = issued.stx.wire().out_refs(issued.stx.id()).remove(0);
        let mut client_updates = vault_events(&net.client);

        let first = net
            .bank
            .start_flow(CashPaymentFlow::new(input.clone(), net.client.identity().clone()));
        assert!(tokio::time::timeout(STEP_TIMEOUT, first).await.unwrap().is_ok());
        assert_eq!(next_update(&mut client_updates).await.produced.len(), 1);

        let second = net
            .bank
            .start_flow(CashPaymentFlow::new(input.clone(), net.client.identity().clone()));
        let result = tokio::time::timeout(STEP_TIMEOUT, second).await.unwrap();
        assert!(matches!(result, Err(FlowError::Conflict { .. })));

        // The receiver learned of the conflict and recorded nothing.
        assert!(drain_updates(&mut client_updates).is_empty());
        assert_eq!(net.client.vault().current_states().await.len(), 1);
    }

    #[tokio::test]
    async fn test_paying_someone_elses_cash_is_rejected() {
        let net = TestNetwork::new();

        let issued = net
            .issue(&net.client, Amount::dollars(10), net.client.identity())
            .await
            .unwrap();
        let client_cash = issued.stx.wire().out_refs(issued.stx.id()).remove(0);

        // The bank tries to spend the client's state.
        let result = tokio::time::timeout(
            STEP_TIMEOUT,
            net.bank
                .start_flow(CashPaymentFlow::new(client_cash, net.bank.identity().clone())),
        )
        .await
        .unwrap();
        assert!(matches!(result, Err(FlowError::Business(_))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_no_update_consumes_a_state_twice() {
        let net = TestNetwork::new();
        let _client_payments = register_payment_receiver(net.client.router());

        let mut inputs = Vec::new();
        for _ in 0..3 {
            let issued = net
                .issue(&net.bank, Amount::dollars(1), net.bank.identity())
                .await
                .unwrap();
            inputs.push(issued.stx.wire().out_refs(issued.stx.id()).remove(0));
        }
        let mut bank_updates = vault_events(&net.bank);

        // Every state is spent by two racing flows.
        let handles: Vec<_> = inputs
            .iter()
            .flat_map(|input| [input.clone(), input.clone()])
            .map(|input| {
                net.bank
                    .start_flow(CashPaymentFlow::new(input, net.client.identity().clone()))
            })
            .collect();
        let results = tokio::time::timeout(STEP_TIMEOUT, futures::future::join_all(handles))
            .await
            .unwrap();

        let completed = results.iter().filter(|r| r.is_ok()).count();
        let conflicts = results
            .iter()
            .filter(|r| matches!(r, Err(FlowError::Conflict { .. })))
            .count();
        assert_eq!((completed, conflicts), (3, 3));

        let mut seen = HashSet::new();
        for update in drain_updates(&mut bank_updates) {
            for consumed in update.consumed_refs() {
                assert!(seen.insert(consumed), "{consumed} consumed twice");
            }
        }
        assert_eq!(seen.len(), 3);
    }
}
