// Path: crates/services/src/governance/genesis.rs
//! Import and export of the complete governance state.

use super::deposits::get_all_deposits;
use super::store::{
    all_proposals, encode, enqueue, next_proposal_id, save_proposal, scan_values,
    set_next_proposal_id, DEFAULT_STARTING_PROPOSAL_ID,
};
use agora_api::bank::BankKeeper;
use agora_api::state::StateAccess;
use agora_types::app::{AccountId, Deposit, Proposal, ProposalStatus, Vote};
use agora_types::error::{GovernanceError, StateError, TransactionError};
use agora_types::keys::{
    deposit_key, vote_key, GOVERNANCE_DEPOSIT_QUEUE_PREFIX, GOVERNANCE_VOTE_KEY_PREFIX,
    GOVERNANCE_VOTING_QUEUE_PREFIX,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// The governance section of a genesis document.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct GovernanceGenesis {
    /// The ID the next submitted proposal receives.
    pub starting_proposal_id: u64,
    /// Every proposal, in any status.
    pub proposals: Vec<Proposal>,
    /// Every live deposit.
    pub deposits: Vec<Deposit>,
    /// Every vote on a proposal in its voting period.
    pub votes: Vec<Vote>,
}

impl Default for GovernanceGenesis {
    fn default() -> Self {
        Self {
            starting_proposal_id: DEFAULT_STARTING_PROPOSAL_ID,
            proposals: Vec::new(),
            deposits: Vec::new(),
            votes: Vec::new(),
        }
    }
}

impl GovernanceGenesis {
    /// Parses a genesis section from JSON.
    pub fn from_json(json: &str) -> Result<Self, TransactionError> {
        serde_json::from_str(json).map_err(|e| TransactionError::Deserialization(e.to_string()))
    }

    /// Serializes the genesis section as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, TransactionError> {
        serde_json::to_string_pretty(self).map_err(|e| TransactionError::Serialization(e.to_string()))
    }
}

fn mismatch(reason: String) -> TransactionError {
    GovernanceError::GenesisMismatch(reason).into()
}

/// Writes a genesis section into `state` and rebuilds the end-time queues.
///
/// Rejects documents whose deposits, votes, or custody balance disagree with
/// the proposals they reference, and deposit-period proposals that already
/// hold `min_deposit`.
pub(crate) fn init_genesis(
    state: &mut dyn StateAccess,
    bank: &dyn BankKeeper,
    custody: &AccountId,
    min_deposit: u64,
    genesis: &GovernanceGenesis,
) -> Result<(), TransactionError> {
    let mut by_id: BTreeMap<u64, &Proposal> = BTreeMap::new();
    for proposal in &genesis.proposals {
        if by_id.insert(proposal.id, proposal).is_some() {
            return Err(mismatch(format!("duplicate proposal {}", proposal.id)));
        }
    }
    if let Some(max_id) = by_id.keys().next_back() {
        if genesis.starting_proposal_id <= *max_id {
            return Err(mismatch(format!(
                "starting proposal id {} does not exceed existing id {}",
                genesis.starting_proposal_id, max_id
            )));
        }
    }

    let mut deposit_sums: BTreeMap<u64, u64> = BTreeMap::new();
    let mut live_total = 0u64;
    let mut depositors = BTreeSet::new();
    for deposit in &genesis.deposits {
        if !depositors.insert((deposit.proposal_id, deposit.depositor)) {
            return Err(mismatch(format!(
                "duplicate deposit by {} on proposal {}",
                deposit.depositor, deposit.proposal_id
            )));
        }
        let proposal = by_id.get(&deposit.proposal_id).ok_or_else(|| {
            mismatch(format!("deposit on unknown proposal {}", deposit.proposal_id))
        })?;
        if proposal.status.is_terminal() {
            return Err(mismatch(format!(
                "deposit on resolved proposal {}",
                deposit.proposal_id
            )));
        }
        let sum = deposit_sums.entry(deposit.proposal_id).or_insert(0);
        *sum = sum
            .checked_add(deposit.amount)
            .ok_or_else(|| mismatch("deposit sum overflow".into()))?;
        live_total = live_total
            .checked_add(deposit.amount)
            .ok_or_else(|| mismatch("deposit sum overflow".into()))?;
    }
    for proposal in by_id.values() {
        let recorded = deposit_sums.get(&proposal.id).copied().unwrap_or(0);
        if recorded != proposal.total_deposit {
            return Err(mismatch(format!(
                "proposal {} total deposit {} does not match deposits {}",
                proposal.id, proposal.total_deposit, recorded
            )));
        }
        if proposal.status == ProposalStatus::DepositPeriod
            && proposal.total_deposit >= min_deposit
        {
            return Err(mismatch(format!(
                "proposal {} is in its deposit period but holds {} of the {} minimum",
                proposal.id, proposal.total_deposit, min_deposit
            )));
        }
    }
    let mut voters = BTreeSet::new();
    for vote in &genesis.votes {
        if !voters.insert((vote.proposal_id, vote.voter)) {
            return Err(mismatch(format!(
                "duplicate vote by {} on proposal {}",
                vote.voter, vote.proposal_id
            )));
        }
        match by_id.get(&vote.proposal_id) {
            Some(p) if p.status == ProposalStatus::VotingPeriod => {}
            _ => {
                return Err(mismatch(format!(
                    "vote on proposal {} outside its voting period",
                    vote.proposal_id
                )))
            }
        }
    }
    let custody_balance = bank.balance(state, custody)?;
    if custody_balance < live_total {
        return Err(mismatch(format!(
            "custody balance {} does not cover deposits {}",
            custody_balance, live_total
        )));
    }

    set_next_proposal_id(state, genesis.starting_proposal_id)?;
    for proposal in by_id.values() {
        save_proposal(state, proposal)?;
        match proposal.status {
            ProposalStatus::DepositPeriod => enqueue(
                state,
                GOVERNANCE_DEPOSIT_QUEUE_PREFIX,
                proposal.deposit_end_time,
                proposal.id,
            )?,
            ProposalStatus::VotingPeriod => enqueue(
                state,
                GOVERNANCE_VOTING_QUEUE_PREFIX,
                proposal.voting_end_time,
                proposal.id,
            )?,
            _ => {}
        }
    }
    for deposit in &genesis.deposits {
        state.insert(
            &deposit_key(deposit.proposal_id, &deposit.depositor),
            &encode(deposit)?,
        )?;
    }
    for vote in &genesis.votes {
        state.insert(&vote_key(vote.proposal_id, &vote.voter), &encode(vote)?)?;
    }

    log::info!(
        "[Governance] genesis imported: {} proposals, {} deposits, {} votes",
        by_id.len(),
        genesis.deposits.len(),
        genesis.votes.len()
    );
    Ok(())
}

/// Reads the complete governance state back into a genesis section.
pub(crate) fn export_genesis(state: &dyn StateAccess) -> Result<GovernanceGenesis, StateError> {
    Ok(GovernanceGenesis {
        starting_proposal_id: next_proposal_id(state)?,
        proposals: all_proposals(state)?,
        deposits: get_all_deposits(state)?,
        votes: scan_values(state, GOVERNANCE_VOTE_KEY_PREFIX)?,
    })
}
