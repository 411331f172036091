// Path: crates/services/src/governance/store.rs
//! Proposal records, the ID counter, and the deposit/voting end-time queues.

use agora_api::state::StateAccess;
use agora_types::app::Proposal;
use agora_types::codec;
use agora_types::error::{GovernanceError, StateError, TransactionError};
use agora_types::keys::{
    parse_queue_key, proposal_key, queue_key, GOVERNANCE_NEXT_PROPOSAL_ID_KEY,
    GOVERNANCE_PROPOSAL_KEY_PREFIX,
};
use parity_scale_codec::{Decode, Encode};

/// The first ID handed out on a chain without a stored counter.
pub const DEFAULT_STARTING_PROPOSAL_ID: u64 = 1;

pub(crate) fn encode<T: Encode>(value: &T) -> Result<Vec<u8>, StateError> {
    codec::to_bytes_canonical(value).map_err(StateError::InvalidValue)
}

pub(crate) fn decode<T: Decode>(bytes: &[u8]) -> Result<T, StateError> {
    codec::from_bytes_canonical(bytes).map_err(StateError::Decode)
}

/// Decodes every value stored under `prefix`, in key order.
pub(crate) fn scan_values<T: Decode>(
    state: &dyn StateAccess,
    prefix: &[u8],
) -> Result<Vec<T>, StateError> {
    state
        .prefix_scan(prefix)?
        .map(|item| item.and_then(|(_, value)| decode(&value)))
        .collect()
}

pub(crate) fn get_proposal(
    state: &dyn StateAccess,
    id: u64,
) -> Result<Option<Proposal>, StateError> {
    state
        .get(&proposal_key(id))?
        .map(|bytes| decode(&bytes))
        .transpose()
}

pub(crate) fn require_proposal(
    state: &dyn StateAccess,
    id: u64,
) -> Result<Proposal, TransactionError> {
    get_proposal(state, id)?.ok_or_else(|| GovernanceError::UnknownProposal(id).into())
}

pub(crate) fn save_proposal(
    state: &mut dyn StateAccess,
    proposal: &Proposal,
) -> Result<(), StateError> {
    state.insert(&proposal_key(proposal.id), &encode(proposal)?)
}

pub(crate) fn all_proposals(state: &dyn StateAccess) -> Result<Vec<Proposal>, StateError> {
    scan_values(state, GOVERNANCE_PROPOSAL_KEY_PREFIX)
}

pub(crate) fn next_proposal_id(state: &dyn StateAccess) -> Result<u64, StateError> {
    match state.get(GOVERNANCE_NEXT_PROPOSAL_ID_KEY)? {
        Some(bytes) => decode(&bytes),
        None => Ok(DEFAULT_STARTING_PROPOSAL_ID),
    }
}

pub(crate) fn set_next_proposal_id(state: &mut dyn StateAccess, id: u64) -> Result<(), StateError> {
    state.insert(GOVERNANCE_NEXT_PROPOSAL_ID_KEY, &encode(&id)?)
}

/// Returns the next ID and advances the counter. IDs are never reused.
pub(crate) fn allocate_proposal_id(state: &mut dyn StateAccess) -> Result<u64, StateError> {
    let id = next_proposal_id(state)?;
    let next = id
        .checked_add(1)
        .ok_or_else(|| StateError::InvalidValue("proposal id space exhausted".into()))?;
    set_next_proposal_id(state, next)?;
    Ok(id)
}

pub(crate) fn enqueue(
    state: &mut dyn StateAccess,
    queue: &[u8],
    end_time: u64,
    id: u64,
) -> Result<(), StateError> {
    state.insert(&queue_key(queue, end_time, id), &[])
}

pub(crate) fn dequeue(
    state: &mut dyn StateAccess,
    queue: &[u8],
    end_time: u64,
    id: u64,
) -> Result<(), StateError> {
    state.delete(&queue_key(queue, end_time, id))
}

/// Returns `(end_time, id)` of every queued proposal with `end_time <= now`,
/// ordered by end time, then ID.
pub(crate) fn due(
    state: &dyn StateAccess,
    queue: &[u8],
    now: u64,
) -> Result<Vec<(u64, u64)>, StateError> {
    let mut entries = Vec::new();
    for item in state.prefix_scan(queue)? {
        let (key, _) = item?;
        let (end_time, id) = parse_queue_key(queue, &key)
            .ok_or_else(|| StateError::Decode("malformed governance queue key".into()))?;
        if end_time > now {
            break;
        }
        entries.push((end_time, id));
    }
    Ok(entries)
}

pub(crate) fn add_time(now: u64, period: u64) -> Result<u64, StateError> {
    now.checked_add(period)
        .ok_or_else(|| StateError::InvalidValue("period end overflows the block clock".into()))
}
