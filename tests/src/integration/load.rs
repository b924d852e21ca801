//! # Concurrency Load Tests
//!
//! Many independent issuances in flight at once. None contend for a state,
//! so every one must complete and every issued state must land exactly once.

#[cfg(test)]
mod tests {
    use crate::integration::harness::{drain_updates, vault_events, TestNetwork, STEP_TIMEOUT};
    use lf_02_flow_engine::FlowError;
    use lf_04_vault::VaultApi;
    use lf_05_issuance::{IssuanceRequester, IssuanceResult};
    use shared_types::{Amount, StateRef};
    use std::collections::BTreeSet;

    const N: u64 = 24;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_issuances_all_complete() {
        let net = TestNetwork::new();
        let mut client_updates = vault_events(&net.client);

        let handles: Vec<_> = (1..=N)
            .map(|i| {
                let request = net.request(Amount::dollars(i), net.client.identity());
                net.client
                    .start_flow(IssuanceRequester::new(request, net.bank.identity().clone()))
            })
            .collect();
        assert!(net.client.router().flows_started() >= N);

        let results: Vec<Result<IssuanceResult, FlowError>> =
            tokio::time::timeout(STEP_TIMEOUT * 3, futures::future::join_all(handles))
                .await
                .unwrap();
        let results: Vec<IssuanceResult> = results.into_iter().map(Result::unwrap).collect();

        // N distinct transactions, N new states, nothing lost or duplicated.
        let tx_ids: BTreeSet<_> = results.iter().map(|r| r.stx.id()).collect();
        assert_eq!(tx_ids.len() as u64, N);

        let live: BTreeSet<StateRef> = net
            .client
            .vault()
            .current_states()
            .await
            .into_iter()
            .map(|s| s.state_ref)
            .collect();
        assert_eq!(live.len() as u64, N);

        let delivered: BTreeSet<StateRef> = results
            .iter()
            .flat_map(|r| r.stx.wire().output_refs(r.stx.id()))
            .collect();
        assert_eq!(live, delivered);

        let updates = drain_updates(&mut client_updates);
        assert_eq!(updates.len() as u64, N);
        assert!(updates.iter().all(|u| u.consumed.is_empty() && u.produced.len() == 1));

        assert!(net.bank.vault().current_states().await.is_empty());
        assert_eq!(net.network.notary().commits(), 2 * N);
        assert_eq!(net.client.router().flows_in_flight(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_self_issuances() {
        let net = TestNetwork::new();
        let mut bank_updates = vault_events(&net.bank);

        let handles: Vec<_> = (0..N)
            .map(|_| {
                let request = net.request(Amount::dollars(1), net.bank.identity());
                net.bank
                    .start_flow(IssuanceRequester::new(request, net.bank.identity().clone()))
            })
            .collect();
        let results = tokio::time::timeout(STEP_TIMEOUT * 3, futures::future::join_all(handles))
            .await
            .unwrap();
        assert!(results.iter().all(Result::is_ok));

        assert_eq!(net.bank.vault().current_states().await.len() as u64, N);
        assert_eq!(drain_updates(&mut bank_updates).len() as u64, N);
    }
}
