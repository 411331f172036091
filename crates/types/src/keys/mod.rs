// Path: crates/types/src/keys/mod.rs
//! Defines constants for well-known state keys and builders for composite keys.
//!
//! Integers inside keys are big-endian so that prefix scans return records in
//! numeric order (proposal id, then account bytes; or end time, then id).

use crate::app::AccountId;

/// The state key for the canonical `ValidatorSetBlob` structure.
pub const VALIDATOR_SET_KEY: &[u8] = b"system::validators::current";

/// The state key prefix for account balances.
pub const BANK_BALANCE_PREFIX: &[u8] = b"bank::balance::";

/// The state key for the next available proposal ID.
pub const GOVERNANCE_NEXT_PROPOSAL_ID_KEY: &[u8] = b"gov::next_id";
/// The state key prefix for storing proposals by ID.
pub const GOVERNANCE_PROPOSAL_KEY_PREFIX: &[u8] = b"gov::proposal::";
/// The state key prefix for storing deposits by (proposal ID, depositor).
pub const GOVERNANCE_DEPOSIT_KEY_PREFIX: &[u8] = b"gov::deposit::";
/// The state key prefix for storing votes by (proposal ID, voter).
pub const GOVERNANCE_VOTE_KEY_PREFIX: &[u8] = b"gov::vote::";
/// Queue of proposals in their deposit period, keyed by (deposit end time, ID).
pub const GOVERNANCE_DEPOSIT_QUEUE_PREFIX: &[u8] = b"gov::queue::deposit::";
/// Queue of proposals in their voting period, keyed by (voting end time, ID).
pub const GOVERNANCE_VOTING_QUEUE_PREFIX: &[u8] = b"gov::queue::voting::";

/// The name from which the governance custody account is derived.
pub const GOVERNANCE_MODULE_NAME: &str = "governance";

/// Key of a single account balance.
pub fn balance_key(account: &AccountId) -> Vec<u8> {
    [BANK_BALANCE_PREFIX, account.as_ref()].concat()
}

/// Key of a single proposal.
pub fn proposal_key(id: u64) -> Vec<u8> {
    [GOVERNANCE_PROPOSAL_KEY_PREFIX, &id.to_be_bytes()].concat()
}

/// Prefix covering every deposit on a proposal.
pub fn deposits_prefix(proposal_id: u64) -> Vec<u8> {
    [GOVERNANCE_DEPOSIT_KEY_PREFIX, &proposal_id.to_be_bytes(), b"::"].concat()
}

/// Key of a single deposit.
pub fn deposit_key(proposal_id: u64, depositor: &AccountId) -> Vec<u8> {
    [deposits_prefix(proposal_id).as_slice(), depositor.as_ref()].concat()
}

/// Prefix covering every vote on a proposal.
pub fn votes_prefix(proposal_id: u64) -> Vec<u8> {
    [GOVERNANCE_VOTE_KEY_PREFIX, &proposal_id.to_be_bytes(), b"::"].concat()
}

/// Key of a single vote.
pub fn vote_key(proposal_id: u64, voter: &AccountId) -> Vec<u8> {
    [votes_prefix(proposal_id).as_slice(), voter.as_ref()].concat()
}

/// Key of a queue entry.
pub fn queue_key(queue_prefix: &[u8], end_time: u64, proposal_id: u64) -> Vec<u8> {
    [
        queue_prefix,
        &end_time.to_be_bytes(),
        &proposal_id.to_be_bytes(),
    ]
    .concat()
}

/// Splits the `(end_time, proposal_id)` suffix off a queue key.
pub fn parse_queue_key(queue_prefix: &[u8], key: &[u8]) -> Option<(u64, u64)> {
    let rest = key.strip_prefix(queue_prefix)?;
    if rest.len() != 16 {
        return None;
    }
    let (time, id) = rest.split_at(8);
    Some((
        u64::from_be_bytes(time.try_into().ok()?),
        u64::from_be_bytes(id.try_into().ok()?),
    ))
}
