//! Flow engine tuning.

use std::time::Duration;

/// Timeouts and buffer sizes used by every flow on a node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlowConfig {
    /// Longest a flow waits on a single session send or receive.
    pub session_timeout: Duration,
    /// Longest a flow waits for one notary round trip.
    pub notary_timeout: Duration,
    /// Extra attempts after a transient notary failure.
    pub notary_retries: u32,
    /// Per-direction message buffer of a session.
    pub session_buffer: usize,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            session_timeout: Duration::from_secs(30),
            notary_timeout: Duration::from_secs(30),
            notary_retries: 3,
            session_buffer: 64,
        }
    }
}
