//! Which part of a committed transaction concerns this node.

use shared_types::{PublicKeyHandle, SecureHash, StateAndRef, StateRef, VaultUpdate, WireTransaction};
use std::collections::BTreeSet;

/// Delta of `wire` (committed as `tx_id`) for a node holding `our_keys`.
///
/// Inputs the node holds become consumed; outputs naming one of our keys
/// as participant become produced. `lookup` returns the live state for a
/// reference, or `None` when the node does not hold it.
pub fn relevant_delta<F>(
    wire: &WireTransaction,
    tx_id: SecureHash,
    our_keys: &BTreeSet<PublicKeyHandle>,
    lookup: F,
) -> VaultUpdate
where
    F: Fn(&StateRef) -> Option<StateAndRef>,
{
    let consumed = wire.inputs.iter().filter_map(|input| lookup(input)).collect();
    let produced = wire
        .out_refs(tx_id)
        .into_iter()
        .filter(|output| output.state.is_relevant_to(our_keys))
        .collect();

    VaultUpdate {
        tx_id,
        consumed,
        produced,
    }
}
