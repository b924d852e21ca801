//! # Outbound Ports (Driven Ports / SPI)

use crate::domain::errors::VaultError;
use shared_types::{SecureHash, StateAndRef, StateRef, VaultUpdate};

/// Storage of live states.
///
/// `apply` is atomic: a reader sees the store either before or after the
/// whole delta, and a rejected delta changes nothing.
pub trait VaultStore: Send + Sync {
    /// Apply the delta of transaction `update.tx_id`.
    fn apply(&self, update: &VaultUpdate) -> Result<(), VaultError>;

    /// Whether a delta for `tx_id` was already applied.
    fn is_recorded(&self, tx_id: &SecureHash) -> bool;

    /// The live state at `state_ref`.
    fn get(&self, state_ref: &StateRef) -> Option<StateAndRef>;

    /// Every live state, ordered by reference.
    fn live_states(&self) -> Vec<StateAndRef>;
}
