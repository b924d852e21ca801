//! # Flow Sessions
//!
//! A session is a private, ordered, bidirectional channel between exactly
//! two flow instances. Each end is owned by one instance and is not
//! `Clone`, so a session can never be shared between instances.
//!
//! Payloads travel in canonical encoding. A failed instance sends a
//! [`RemoteFailure`] to its peers; receiving one ends the wait with the
//! matching [`FlowError`].

use crate::domain::errors::{FlowError, RemoteFailure};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared_types::{canonical_bytes, from_canonical_bytes, Party, ProtocolId, SessionId};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

/// One message on a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionMessage {
    /// Canonically encoded payload.
    Data(Vec<u8>),
    /// The peer instance failed.
    Failure(RemoteFailure),
}

/// One end of a session.
#[derive(Debug)]
pub struct FlowSession {
    id: SessionId,
    counterparty: Party,
    protocol: ProtocolId,
    outbound: mpsc::Sender<SessionMessage>,
    inbound: mpsc::Receiver<SessionMessage>,
    timeout: Duration,
}

impl FlowSession {
    /// Both ends of a new session: the initiator's end (whose counterparty
    /// is `responder`) and the responder's end.
    pub fn pair(
        initiator: Party,
        responder: Party,
        protocol: ProtocolId,
        buffer: usize,
        timeout: Duration,
    ) -> (FlowSession, FlowSession) {
        let id = SessionId::random();
        let (to_responder, from_initiator) = mpsc::channel(buffer.max(1));
        let (to_initiator, from_responder) = mpsc::channel(buffer.max(1));

        let initiator_end = FlowSession {
            id,
            counterparty: responder,
            protocol: protocol.clone(),
            outbound: to_responder,
            inbound: from_responder,
            timeout,
        };
        let responder_end = FlowSession {
            id,
            counterparty: initiator,
            protocol,
            outbound: to_initiator,
            inbound: from_initiator,
            timeout,
        };
        (initiator_end, responder_end)
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// The node at the other end.
    pub fn counterparty(&self) -> &Party {
        &self.counterparty
    }

    pub fn protocol(&self) -> &ProtocolId {
        &self.protocol
    }

    /// Send a payload. Suspends while the peer's buffer is full.
    pub async fn send<T: Serialize + ?Sized>(&self, payload: &T) -> Result<(), FlowError> {
        let bytes = canonical_bytes(payload)
            .map_err(|e| FlowError::protocol(format!("cannot encode payload: {e}")))?;
        let len = bytes.len();

        match tokio::time::timeout(self.timeout, self.outbound.send(SessionMessage::Data(bytes)))
            .await
        {
            Ok(Ok(())) => {
                debug!(session_id = %self.id, to = %self.counterparty, len, "Session message sent");
                Ok(())
            }
            Ok(Err(_)) => Err(FlowError::protocol(format!(
                "session to {} closed",
                self.counterparty
            ))),
            Err(_) => Err(FlowError::protocol(format!(
                "timed out sending to {}",
                self.counterparty
            ))),
        }
    }

    /// Receive the next payload, in send order.
    pub async fn receive<T: DeserializeOwned>(&mut self) -> Result<T, FlowError> {
        let message = match tokio::time::timeout(self.timeout, self.inbound.recv()).await {
            Ok(Some(message)) => message,
            Ok(None) => {
                return Err(FlowError::protocol(format!(
                    "session closed by {}",
                    self.counterparty
                )))
            }
            Err(_) => {
                return Err(FlowError::protocol(format!(
                    "timed out waiting for {}",
                    self.counterparty
                )))
            }
        };

        match message {
            SessionMessage::Data(bytes) => {
                debug!(session_id = %self.id, from = %self.counterparty, len = bytes.len(), "Session message received");
                from_canonical_bytes(&bytes).map_err(|e| {
                    FlowError::protocol(format!(
                        "unexpected message from {}: {e}",
                        self.counterparty
                    ))
                })
            }
            SessionMessage::Failure(failure) => {
                debug!(session_id = %self.id, from = %self.counterparty, ?failure, "Counterparty failed");
                Err(failure.into())
            }
        }
    }

    /// Send `payload`, then wait for the reply.
    pub async fn send_and_receive<S, R>(&mut self, payload: &S) -> Result<R, FlowError>
    where
        S: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        self.send(payload).await?;
        self.receive().await
    }

    /// Sender used to notify the peer if the owning instance fails.
    pub(crate) fn failure_notifier(&self) -> mpsc::Sender<SessionMessage> {
        self.outbound.clone()
    }
}
