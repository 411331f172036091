// Path: crates/services/src/governance/votes.rs
//! One vote per (proposal, voter); a revote overwrites the earlier record.

use super::store::{decode, encode, require_proposal, scan_values};
use agora_api::state::StateAccess;
use agora_types::app::{AccountId, ProposalStatus, Vote, VoteOption};
use agora_types::error::{GovernanceError, StateError, TransactionError};
use agora_types::keys::{vote_key, votes_prefix};

pub(crate) fn add_vote(
    state: &mut dyn StateAccess,
    proposal_id: u64,
    voter: &AccountId,
    option_tag: u8,
) -> Result<VoteOption, TransactionError> {
    let proposal = require_proposal(state, proposal_id)?;
    if proposal.status != ProposalStatus::VotingPeriod {
        return Err(GovernanceError::InactiveProposal(proposal_id).into());
    }
    let option = VoteOption::try_from(option_tag)?;
    let vote = Vote {
        proposal_id,
        voter: *voter,
        option,
    };
    state.insert(&vote_key(proposal_id, voter), &encode(&vote)?)?;
    Ok(option)
}

pub(crate) fn get_vote(
    state: &dyn StateAccess,
    proposal_id: u64,
    voter: &AccountId,
) -> Result<Option<Vote>, StateError> {
    state
        .get(&vote_key(proposal_id, voter))?
        .map(|bytes| decode(&bytes))
        .transpose()
}

/// Votes on one proposal, ordered by voter.
pub(crate) fn get_votes(state: &dyn StateAccess, proposal_id: u64) -> Result<Vec<Vote>, StateError> {
    scan_values(state, &votes_prefix(proposal_id))
}

pub(crate) fn delete_votes(state: &mut dyn StateAccess, proposal_id: u64) -> Result<usize, StateError> {
    let votes = get_votes(state, proposal_id)?;
    for vote in &votes {
        state.delete(&vote_key(proposal_id, &vote.voter))?;
    }
    Ok(votes.len())
}
