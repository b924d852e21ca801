//! # Flow Context
//!
//! The handle flow logic uses to act on the world. Every helper that
//! suspends (session I/O, the notary, the ledger) also advances the
//! instance's state machine, so the staging order is enforced here rather
//! than trusted to each protocol:
//!
//! - no notary submission before every required signature verifies
//! - no ledger commit before the notary accepts
//! - no vault event before the ledger commit

use crate::domain::config::FlowConfig;
use crate::domain::errors::{FlowError, RemoteFailure};
use crate::domain::state::{FlowState, FlowStateMachine};
use crate::domain::transaction::{
    CollectingSignatures, FullySigned, Notarised, SignedTransaction, StagedTransaction,
    TransactionBuilder,
};
use crate::ports::outbound::{
    LedgerPort, NotaryClient, NotaryClientError, NotaryResponse, SessionTransport,
};
use crate::session::{FlowSession, SessionMessage};
use lf_01_signature_binding::{SignatureBinder, SignatureBindingApi, TransactionSignature};
use shared_bus::InMemoryEventBus;
use shared_crypto::KeyPair;
use shared_types::{ContentRoot, FlowId, FlowRole, Party, ProtocolId, StateAndRef, WireTransaction};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Everything a node offers its flows.
///
/// Built once per node at startup and shared by every instance.
pub struct ServiceHub {
    /// This node's identity.
    pub identity: Party,
    /// Key matching `identity.owning_key`.
    pub key: Arc<KeyPair>,
    pub binder: SignatureBinder,
    pub notary: Arc<dyn NotaryClient>,
    pub ledger: Arc<dyn LedgerPort>,
    pub transport: Arc<dyn SessionTransport>,
    /// The node's event bus.
    pub bus: Arc<InMemoryEventBus>,
    pub config: FlowConfig,
}

impl std::fmt::Debug for ServiceHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceHub")
            .field("identity", &self.identity)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Per-instance context, owned by the instance's task.
pub struct FlowContext {
    id: FlowId,
    role: FlowRole,
    protocol: ProtocolId,
    machine: FlowStateMachine,
    hub: Arc<ServiceHub>,
    peers: Vec<mpsc::Sender<SessionMessage>>,
}

impl FlowContext {
    pub(crate) fn new(
        id: FlowId,
        role: FlowRole,
        protocol: ProtocolId,
        machine: FlowStateMachine,
        hub: Arc<ServiceHub>,
    ) -> Self {
        Self {
            id,
            role,
            protocol,
            machine,
            hub,
            peers: Vec::new(),
        }
    }

    pub fn id(&self) -> FlowId {
        self.id
    }

    pub fn role(&self) -> FlowRole {
        self.role
    }

    pub fn protocol(&self) -> &ProtocolId {
        &self.protocol
    }

    pub fn state(&self) -> FlowState {
        self.machine.current()
    }

    pub fn hub(&self) -> &ServiceHub {
        &self.hub
    }

    pub fn our_identity(&self) -> &Party {
        &self.hub.identity
    }

    /// The notary this node submits to.
    pub fn notary_identity(&self) -> &Party {
        self.hub.notary.identity()
    }

    /// Peer to notify if this instance fails.
    pub(crate) fn add_peer(&mut self, peer: mpsc::Sender<SessionMessage>) {
        self.peers.push(peer);
    }

    // =========================================================================
    // SESSIONS
    // =========================================================================

    /// Open a session to this flow's protocol responder on `counterparty`.
    pub async fn initiate(&mut self, counterparty: &Party) -> Result<FlowSession, FlowError> {
        if self.state() == FlowState::Created {
            self.machine.advance(FlowState::AwaitingCounterparty)?;
        }
        let session = self
            .hub
            .transport
            .open_session(&self.hub.identity, counterparty, &self.protocol)
            .await?;
        debug!(session_id = %session.id(), counterparty = %counterparty, "Session opened");
        self.add_peer(session.failure_notifier());
        Ok(session)
    }

    /// The business exchange is done; content may now be assembled.
    pub fn begin_building(&mut self) -> Result<(), FlowError> {
        self.machine.ensure(FlowState::BuildingTransaction)
    }

    // =========================================================================
    // SIGNATURES
    // =========================================================================

    /// Freeze `builder` and add our own signature if we are a required signer.
    pub fn sign(
        &mut self,
        builder: &TransactionBuilder,
    ) -> Result<StagedTransaction<CollectingSignatures>, FlowError> {
        self.machine.ensure(FlowState::BuildingTransaction)?;
        let mut staged = StagedTransaction::new(builder.to_wire())?;
        self.machine.advance(FlowState::AwaitingSignatures)?;

        if staged.wire().required_signers().contains(&self.hub.identity.owning_key) {
            let signature = self.sign_root(staged.id())?;
            staged.add_signature(signature);
        }
        Ok(staged)
    }

    /// Ask the counterparty on `session` to sign; its signature must be by
    /// its own key and over this transaction's root.
    pub async fn collect_signature(
        &mut self,
        staged: &mut StagedTransaction<CollectingSignatures>,
        session: &mut FlowSession,
    ) -> Result<(), FlowError> {
        let signature: TransactionSignature = session.send_and_receive(staged.wire()).await?;
        let report = self
            .hub
            .binder
            .verify_against(&staged.id(), &session.counterparty().owning_key, &signature)?;
        if !report.version_matches() {
            warn!(
                signer = %session.counterparty(),
                version = report.platform_version,
                expected = report.expected_platform_version,
                "Counterparty signed under a different platform version"
            );
        }
        debug!(tx_id = %staged.id().short(), signer = %session.counterparty(), "Collected signature");
        staged.add_signature(signature);
        Ok(())
    }

    /// Responder side of `collect_signature`: receive the proposal, run
    /// `check` on it and return our signature.
    pub async fn sign_for_counterparty<F>(
        &mut self,
        session: &mut FlowSession,
        check: F,
    ) -> Result<ContentRoot, FlowError>
    where
        F: FnOnce(&WireTransaction) -> Result<(), FlowError> + Send,
    {
        self.machine.ensure(FlowState::BuildingTransaction)?;
        let wire: WireTransaction = session.receive().await?;
        check(&wire)?;

        if !wire.required_signers().contains(&self.hub.identity.owning_key) {
            return Err(FlowError::protocol("asked to sign a transaction we are not required on"));
        }
        let root = wire.id().map_err(lf_01_signature_binding::BindingError::from)?;
        let signature = self.sign_root(root)?;
        session.send(&signature).await?;
        Ok(root)
    }

    /// Require every signature to verify and none to be missing.
    pub fn verify_signatures(
        &self,
        staged: StagedTransaction<CollectingSignatures>,
    ) -> Result<StagedTransaction<FullySigned>, FlowError> {
        staged.verify_signatures(&self.hub.binder)
    }

    fn sign_root(&self, root: ContentRoot) -> Result<TransactionSignature, FlowError> {
        Ok(self.hub.binder.sign_root(&self.hub.key, root)?)
    }

    // =========================================================================
    // NOTARY
    // =========================================================================

    /// Submit to the notary and wait for its verdict.
    ///
    /// Transient failures and timeouts are retried up to the configured
    /// limit; the notary is idempotent per root so a retry cannot double
    /// spend. A rejection is final.
    pub async fn notarise(
        &mut self,
        signed: StagedTransaction<FullySigned>,
    ) -> Result<StagedTransaction<Notarised>, FlowError> {
        self.machine.advance(FlowState::AwaitingNotary)?;
        let root = signed.id();
        let inputs = signed.input_refs();
        let notary_key = self.hub.notary.identity().owning_key;
        if signed.wire().notary.owning_key != notary_key {
            return Err(FlowError::protocol(format!(
                "transaction names notary {}, this node uses {}",
                signed.wire().notary,
                self.hub.notary.identity()
            )));
        }
        let attempts = self.hub.config.notary_retries + 1;

        let mut attempt = 0;
        let response = loop {
            attempt += 1;
            let request = self.hub.notary.request_uniqueness(inputs.clone(), root);
            let failure = match tokio::time::timeout(self.hub.config.notary_timeout, request).await
            {
                Ok(Ok(response)) => break response,
                Ok(Err(NotaryClientError::Refused(reason))) => {
                    return Err(FlowError::protocol(format!("notary refused: {reason}")))
                }
                Ok(Err(NotaryClientError::Unavailable(reason))) => reason,
                Err(_) => "timed out".to_string(),
            };
            if attempt >= attempts {
                return Err(FlowError::protocol(format!(
                    "notary unreachable after {attempts} attempt(s): {failure}"
                )));
            }
            warn!(tx_id = %root.short(), attempt, %failure, "Notary request failed, retrying");
        };

        match response {
            NotaryResponse::Accept(signature) => {
                let report = self.hub.binder.verify_against(&root, &notary_key, &signature)?;
                if !report.version_matches() {
                    warn!(
                        tx_id = %root.short(),
                        version = report.platform_version,
                        "Notary signed under a different platform version"
                    );
                }
                self.machine.advance(FlowState::Finalizing)?;
                debug!(tx_id = %root.short(), "Notary accepted");
                Ok(signed.notarised(signature))
            }
            NotaryResponse::Reject { conflicts } => {
                warn!(tx_id = %root.short(), conflicts = conflicts.len(), "Notary rejected transaction");
                Err(FlowError::Conflict { conflicts })
            }
        }
    }

    // =========================================================================
    // LEDGER
    // =========================================================================

    /// Commit a notarised transaction to the local ledger.
    pub async fn record(
        &mut self,
        notarised: StagedTransaction<Notarised>,
    ) -> Result<SignedTransaction, FlowError> {
        let transaction = notarised.into_signed();
        self.commit(&transaction).await?;
        Ok(transaction)
    }

    /// Send a finished transaction to a participant.
    pub async fn send_finalised(
        &mut self,
        session: &FlowSession,
        transaction: &SignedTransaction,
    ) -> Result<(), FlowError> {
        session.send(transaction).await
    }

    /// Receive a finished transaction, check every signature including the
    /// notary's, and record it.
    pub async fn receive_finalised(
        &mut self,
        session: &mut FlowSession,
    ) -> Result<SignedTransaction, FlowError> {
        self.receive_finalised_checked(session, |_| Ok(())).await
    }

    /// As `receive_finalised`, with `check` run on the verified transaction
    /// before it is recorded.
    pub async fn receive_finalised_checked<F>(
        &mut self,
        session: &mut FlowSession,
        check: F,
    ) -> Result<SignedTransaction, FlowError>
    where
        F: FnOnce(&SignedTransaction) -> Result<(), FlowError> + Send,
    {
        if self.state() != FlowState::Finalizing {
            self.machine.ensure(FlowState::BuildingTransaction)?;
            self.machine.advance(FlowState::Finalizing)?;
        }
        let transaction: SignedTransaction = session.receive().await?;
        transaction.verify(&self.hub.binder, self.hub.notary.identity())?;
        check(&transaction)?;
        self.commit(&transaction).await?;
        Ok(transaction)
    }

    /// Live states of the local ledger.
    pub async fn current_states(&self) -> Vec<StateAndRef> {
        self.hub.ledger.current_states().await
    }

    async fn commit(&mut self, transaction: &SignedTransaction) -> Result<(), FlowError> {
        let update = self.hub.ledger.record(transaction).await?;
        info!(
            tx_id = %transaction.id().short(),
            consumed = update.consumed.len(),
            produced = update.produced.len(),
            "Transaction recorded"
        );
        Ok(())
    }

    // =========================================================================
    // TERMINATION
    // =========================================================================

    /// Move to the terminal state matching `result`; on failure tell every
    /// peer. A logic that returns `Ok` from a state with no edge to
    /// `Completed` fails instead.
    pub(crate) fn finish<T>(&mut self, result: Result<T, FlowError>) -> Result<T, FlowError> {
        let result = result.and_then(|value| {
            self.machine.ensure(FlowState::Completed)?;
            Ok(value)
        });

        if let Err(error) = &result {
            if !self.state().is_terminal() {
                // Failed is reachable from any live state.
                let _ = self.machine.advance(FlowState::Failed);
            }
            let failure = RemoteFailure::from(error);
            for peer in self.peers.drain(..) {
                if let Err(error) = peer.try_send(SessionMessage::Failure(failure.clone())) {
                    warn!(flow_id = %self.id, %error, "Could not tell a counterparty about the failure");
                }
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::outbound::{MockLedger, MockNotary};
    use crate::testing::hub_with;
    use shared_types::{Command, ContractId, OpaqueBytes, TransactionState};

    fn context(hub: Arc<ServiceHub>) -> FlowContext {
        let id = FlowId::random();
        let (machine, _rx) = FlowStateMachine::new(id);
        FlowContext::new(id, FlowRole::Initiator, ProtocolId::new("test.v1"), machine, hub)
    }

    fn issue(ctx: &FlowContext) -> TransactionBuilder {
        let me = ctx.our_identity().clone();
        let mut builder = TransactionBuilder::new(ctx.notary_identity().clone());
        builder
            .add_output(TransactionState {
                contract: ContractId::new("test"),
                participants: vec![me.owning_key],
                notary: ctx.notary_identity().clone(),
                data: OpaqueBytes::of(1),
            })
            .add_command(Command::new("test.issue", vec![me.owning_key]));
        builder
    }

    #[tokio::test]
    async fn test_single_party_pipeline() {
        let notary = Arc::new(MockNotary::new());
        let ledger = Arc::new(MockLedger::default());
        let mut ctx = context(hub_with("Alice", notary.clone(), ledger.clone()));

        let staged = ctx.sign(&issue(&ctx)).unwrap();
        assert_eq!(ctx.state(), FlowState::AwaitingSignatures);
        assert_eq!(ledger.recorded().len(), 0);

        let signed = ctx.verify_signatures(staged).unwrap();
        let notarised = ctx.notarise(signed).await.unwrap();
        assert_eq!(ctx.state(), FlowState::Finalizing);

        let stx = ctx.record(notarised).await.unwrap();
        assert_eq!(ledger.recorded().len(), 1);
        assert_eq!(ledger.recorded()[0].tx_id, stx.id());
        assert_eq!(notary.requests(), 1);

        assert!(ctx.finish(Ok(())).is_ok());
        assert_eq!(ctx.state(), FlowState::Completed);
    }

    #[tokio::test]
    async fn test_notary_retries_transient_failures() {
        let notary = Arc::new(MockNotary::new());
        notary.fail_next(2);
        let mut ctx = context(hub_with("Alice", notary.clone(), Arc::new(MockLedger::default())));

        let staged = ctx.sign(&issue(&ctx)).unwrap();
        let signed = ctx.verify_signatures(staged).unwrap();
        assert!(ctx.notarise(signed).await.is_ok());
        assert_eq!(notary.requests(), 3);
    }

    #[tokio::test]
    async fn test_notary_gives_up_after_retries() {
        let notary = Arc::new(MockNotary::new());
        notary.fail_next(10);
        let ledger = Arc::new(MockLedger::default());
        let mut ctx = context(hub_with("Alice", notary.clone(), ledger.clone()));

        let staged = ctx.sign(&issue(&ctx)).unwrap();
        let signed = ctx.verify_signatures(staged).unwrap();
        let result = ctx.notarise(signed).await.map(|_| ());

        assert!(matches!(result, Err(FlowError::Protocol(_))));
        assert_eq!(notary.requests(), 4);
        assert!(ctx.finish(result).is_err());
        assert_eq!(ctx.state(), FlowState::Failed);
        assert!(ledger.recorded().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_silent_notary_times_out_every_attempt() {
        let notary = Arc::new(MockNotary::new());
        notary.go_silent();
        let ledger = Arc::new(MockLedger::default());
        let hub = hub_with("Alice", notary.clone(), ledger.clone());
        let attempts = hub.config.notary_retries as usize + 1;
        let budget = hub.config.notary_timeout * attempts as u32;
        let mut ctx = context(hub);

        let staged = ctx.sign(&issue(&ctx)).unwrap();
        let signed = ctx.verify_signatures(staged).unwrap();
        let started = tokio::time::Instant::now();
        let result = ctx.notarise(signed).await.map(|_| ());

        assert!(matches!(result, Err(FlowError::Protocol(ref msg)) if msg.contains("timed out")));
        assert_eq!(notary.requests(), attempts);
        assert!(started.elapsed() >= budget);
        assert!(ctx.finish(result).is_err());
        assert_eq!(ctx.state(), FlowState::Failed);
        assert!(ledger.recorded().is_empty());
    }

    #[tokio::test]
    async fn test_transaction_for_another_notary_not_submitted() {
        let notary = Arc::new(MockNotary::new());
        let mut ctx = context(hub_with("Alice", notary.clone(), Arc::new(MockLedger::default())));
        let elsewhere = Party::new(
            shared_types::PartyName::new("OtherNotary"),
            KeyPair::generate(shared_types::SignatureScheme::EddsaEd25519).public_key(),
        );

        let me = ctx.our_identity().clone();
        let mut builder = TransactionBuilder::new(elsewhere.clone());
        builder
            .add_output(TransactionState {
                contract: ContractId::new("test"),
                participants: vec![me.owning_key],
                notary: elsewhere,
                data: OpaqueBytes::of(1),
            })
            .add_command(Command::new("test.issue", vec![me.owning_key]));

        let staged = ctx.sign(&builder).unwrap();
        let signed = ctx.verify_signatures(staged).unwrap();
        assert!(matches!(ctx.notarise(signed).await, Err(FlowError::Protocol(_))));
        assert_eq!(notary.requests(), 0);
    }

    #[tokio::test]
    async fn test_ok_from_suspended_state_fails() {
        let mut ctx = context(hub_with(
            "Alice",
            Arc::new(MockNotary::new()),
            Arc::new(MockLedger::default()),
        ));
        let _staged = ctx.sign(&issue(&ctx)).unwrap();

        let result = ctx.finish(Ok(()));
        assert!(matches!(result, Err(FlowError::InvalidTransition { .. })));
        assert_eq!(ctx.state(), FlowState::Failed);
    }

    #[tokio::test]
    async fn test_failure_reaches_peers_past_a_full_one() {
        let mut ctx = context(hub_with(
            "Alice",
            Arc::new(MockNotary::new()),
            Arc::new(MockLedger::default()),
        ));
        let (full, mut full_rx) = mpsc::channel(1);
        full.try_send(SessionMessage::Data(vec![1])).unwrap();
        let (open, mut open_rx) = mpsc::channel(1);
        ctx.add_peer(full);
        ctx.add_peer(open);

        let result = ctx.finish::<()>(Err(FlowError::Business("no".into())));

        assert_eq!(result, Err(FlowError::Business("no".into())));
        assert_eq!(ctx.state(), FlowState::Failed);
        assert!(matches!(
            open_rx.try_recv(),
            Ok(SessionMessage::Failure(RemoteFailure::Business(_)))
        ));
        assert!(matches!(full_rx.try_recv(), Ok(SessionMessage::Data(_))));
        assert!(full_rx.try_recv().is_err());
    }
}
