//! # Forged Finality Tests
//!
//! A counterparty can put any notary it likes on a transaction. Receivers
//! must check the notary signature against the notary they are configured
//! with, so a self-appointed notary records nothing.

#[cfg(test)]
mod tests {
    use crate::integration::harness::{drain_updates, vault_events, TestNetwork, STEP_TIMEOUT};
    use async_trait::async_trait;
    use lf_01_signature_binding::SignatureBindingApi;
    use lf_02_flow_engine::{
        FlowContext, FlowError, FlowLogic, StagedTransaction, TransactionBuilder,
    };
    use lf_04_vault::VaultApi;
    use lf_05_issuance::domain::cash;
    use lf_05_issuance::{register_payment_receiver, PAYMENT_PROTOCOL};
    use shared_crypto::KeyPair;
    use shared_types::{
        Amount, OpaqueBytes, Party, PartyAndReference, PartyName, ProtocolId, SignatureScheme,
    };

    /// Issues cash to `to` under a notary key it generated itself and
    /// pushes the result down the payment protocol.
    struct SelfNotarisedPayment {
        to: Party,
    }

    #[async_trait]
    impl FlowLogic for SelfNotarisedPayment {
        type Output = ();

        fn protocol(&self) -> ProtocolId {
            ProtocolId::new(PAYMENT_PROTOCOL)
        }

        async fn call(self, ctx: &mut FlowContext) -> Result<(), FlowError> {
            let fake_key = KeyPair::generate(SignatureScheme::EddsaEd25519);
            let fake_notary = Party::new(PartyName::new("FakeNotary"), fake_key.public_key());

            let session = ctx.initiate(&self.to).await?;
            ctx.begin_building()?;

            let mut builder = TransactionBuilder::new(fake_notary);
            let issuer = PartyAndReference {
                party: ctx.our_identity().clone(),
                reference: OpaqueBytes::of(7),
            };
            cash::generate_issue(
                &mut builder,
                Amount::dollars(1_000_000),
                issuer,
                self.to.owning_key,
            )?;

            let hub = ctx.hub();
            let mut staged = StagedTransaction::new(builder.to_wire())?;
            staged.add_signature(hub.binder.sign_root(&hub.key, staged.id())?);
            let fully = staged.verify_signatures(&hub.binder)?;
            let forged = hub.binder.sign_root(&fake_key, fully.id())?;
            let stx = fully.notarised(forged).into_signed();

            session.send(&stx).await
        }
    }

    #[tokio::test]
    async fn test_self_appointed_notary_is_not_trusted() {
        let net = TestNetwork::new();
        let mut payments = register_payment_receiver(net.client.router());
        let mut client_updates = vault_events(&net.client);

        let sent = tokio::time::timeout(
            STEP_TIMEOUT,
            net.bank.start_flow(SelfNotarisedPayment {
                to: net.client.identity().clone(),
            }),
        )
        .await
        .unwrap();
        assert!(sent.is_ok());

        let received = tokio::time::timeout(STEP_TIMEOUT, async {
            payments.next().await.unwrap().await
        })
        .await
        .unwrap();
        assert!(matches!(received, Err(FlowError::Protocol(ref msg)) if msg.contains("notary")));

        assert!(net.client.vault().current_states().await.is_empty());
        assert!(drain_updates(&mut client_updates).is_empty());
        assert_eq!(net.network.notary().submissions(), 0);
    }
}
