// Path: crates/services/src/governance/mod.rs
//! The governance module: proposal submission, deposits, voting, and
//! end-of-block resolution.
//!
//! Every transactional method runs in a `StateOverlay` and commits only when
//! it succeeds, so a rejected call leaves no trace in state.

mod deposits;
mod genesis;
mod router;
mod store;
mod tally;
mod votes;

pub use genesis::GovernanceGenesis;
pub use router::{ProposalRouter, TextProposalHandler};
pub use store::DEFAULT_STARTING_PROPOSAL_ID;
pub use tally::{classify, OptionWeights, TallyOutcome, TallyVerdict};

use agora_api::bank::BankKeeper;
use agora_api::governance::ProposalHandler;
use agora_api::lifecycle::OnEndBlock;
use agora_api::staking::VotingPowerSource;
use agora_api::state::{apply_atomically, StateAccess};
use agora_api::transaction::context::TxContext;
use agora_telemetry::time::Timer;
use agora_telemetry::{error_metrics, governance_metrics};
use agora_types::app::{
    AccountId, Deposit, Proposal, ProposalContent, ProposalStatus, Vote,
};
use agora_types::codec;
use agora_types::error::{BankError, ErrorCode, StateError, TransactionError};
use agora_types::keys::{
    GOVERNANCE_DEPOSIT_QUEUE_PREFIX, GOVERNANCE_MODULE_NAME, GOVERNANCE_VOTING_QUEUE_PREFIX,
};
use agora_types::service_configs::GovernanceParams;
use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// --- Service Method Parameter Structs (The Service's Public ABI) ---

/// Parameters of `submit_proposal`.
#[derive(Encode, Decode, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SubmitProposalParams {
    /// The proposal content.
    pub content: ProposalContent,
    /// Deposit escrowed from the proposer in the same call. Zero for none.
    pub initial_deposit: u64,
}

/// Parameters of `deposit`.
#[derive(Encode, Decode, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DepositParams {
    /// The proposal to fund.
    pub proposal_id: u64,
    /// The amount to escrow.
    pub amount: u64,
}

/// Parameters of `vote`.
///
/// `option` is the raw wire tag so that unknown tags surface as
/// `InvalidVoteOption` rather than as a decoding failure.
#[derive(Encode, Decode, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VoteParams {
    /// The proposal voted on.
    pub proposal_id: u64,
    /// The vote option tag: 1 Yes, 2 Abstain, 3 No, 4 NoWithVeto.
    pub option: u8,
}

/// A proposal that reached a terminal status during `end_block`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProposalResolution {
    /// The resolved proposal.
    pub proposal_id: u64,
    /// Its terminal status.
    pub status: ProposalStatus,
    /// The tally classification; `None` when the deposit period expired.
    pub outcome: Option<TallyOutcome>,
}

// --- Governance Module ---

/// The governance state machine.
///
/// Holds no state of its own besides configuration and collaborators; every
/// record lives in the `StateAccess` passed to each call.
#[derive(Clone)]
pub struct GovernanceModule {
    params: GovernanceParams,
    bank: Arc<dyn BankKeeper>,
    power: Arc<dyn VotingPowerSource>,
    handler: Arc<dyn ProposalHandler>,
    module_account: AccountId,
}

impl std::fmt::Debug for GovernanceModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GovernanceModule")
            .field("params", &self.params)
            .field("module_account", &self.module_account)
            .finish_non_exhaustive()
    }
}

/// Counts failed calls in the error metrics.
fn observed<T>(result: Result<T, TransactionError>) -> Result<T, TransactionError> {
    if let Err(e) = &result {
        error_metrics().inc_error("governance", e.code());
    }
    result
}

fn into_state_error(err: TransactionError) -> StateError {
    match err {
        TransactionError::State(e) | TransactionError::Bank(BankError::State(e)) => e,
        other => StateError::Backend(other.to_string()),
    }
}

impl GovernanceModule {
    /// Creates the module with the default `ProposalRouter` (text proposals only).
    pub fn new(
        params: GovernanceParams,
        bank: Arc<dyn BankKeeper>,
        power: Arc<dyn VotingPowerSource>,
    ) -> Self {
        Self {
            params,
            bank,
            power,
            handler: Arc::new(ProposalRouter::default()),
            module_account: AccountId::module(GOVERNANCE_MODULE_NAME),
        }
    }

    /// Replaces the content handler.
    pub fn with_handler(mut self, handler: Arc<dyn ProposalHandler>) -> Self {
        self.handler = handler;
        self
    }

    /// The module's configuration.
    pub fn params(&self) -> &GovernanceParams {
        &self.params
    }

    /// The account that holds escrowed deposits.
    pub fn module_account(&self) -> &AccountId {
        &self.module_account
    }

    // --- Transactions ---

    /// Submits a proposal signed by `ctx.signer_account_id` and returns its ID.
    ///
    /// A non-zero `initial_deposit` is escrowed in the same call. If the total
    /// deposit already meets `min_deposit` the voting period opens immediately.
    pub fn submit_proposal(
        &self,
        state: &mut dyn StateAccess,
        params: SubmitProposalParams,
        ctx: &TxContext,
    ) -> Result<u64, TransactionError> {
        observed(apply_atomically(state, |state| {
            self.handler.validate(&params.content)?;

            let now = ctx.block_timestamp;
            let id = store::allocate_proposal_id(state)?;
            let deposit_end_time = store::add_time(now, self.params.deposit_period_secs)?;
            let proposal = Proposal {
                id,
                content: params.content.clone(),
                status: ProposalStatus::DepositPeriod,
                proposer: ctx.signer_account_id,
                submit_time: now,
                deposit_end_time,
                voting_start_time: 0,
                voting_end_time: 0,
                total_deposit: 0,
                final_tally_result: None,
            };
            store::save_proposal(state, &proposal)?;
            store::enqueue(state, GOVERNANCE_DEPOSIT_QUEUE_PREFIX, deposit_end_time, id)?;
            log::info!(
                "[Governance] proposal {} submitted by {} (route {})",
                id,
                ctx.signer_account_id,
                params.content.proposal_type.route()
            );

            if params.initial_deposit > 0 {
                deposits::add_deposit(
                    state,
                    &*self.bank,
                    &self.module_account,
                    self.params.min_deposit,
                    id,
                    &ctx.signer_account_id,
                    params.initial_deposit,
                )?;
            }
            let proposal = store::require_proposal(state, id)?;
            if proposal.total_deposit >= self.params.min_deposit {
                self.activate(state, proposal, now)?;
            }
            Ok(id)
        }))
        .map(|id| {
            governance_metrics().inc_proposals_submitted(params.content.proposal_type.route());
            if params.initial_deposit > 0 {
                governance_metrics().inc_deposited(params.initial_deposit);
            }
            id
        })
    }

    /// Escrows a deposit from `ctx.signer_account_id`.
    ///
    /// Returns true iff this deposit opened the voting period.
    pub fn deposit(
        &self,
        state: &mut dyn StateAccess,
        params: DepositParams,
        ctx: &TxContext,
    ) -> Result<bool, TransactionError> {
        let activated = observed(apply_atomically(state, |state| {
            let activated = deposits::add_deposit(
                state,
                &*self.bank,
                &self.module_account,
                self.params.min_deposit,
                params.proposal_id,
                &ctx.signer_account_id,
                params.amount,
            )?;
            if activated {
                let proposal = store::require_proposal(state, params.proposal_id)?;
                self.activate(state, proposal, ctx.block_timestamp)?;
            }
            Ok(activated)
        }))?;
        governance_metrics().inc_deposited(params.amount);
        Ok(activated)
    }

    /// Records or overwrites the vote of `ctx.signer_account_id`.
    pub fn vote(
        &self,
        state: &mut dyn StateAccess,
        params: VoteParams,
        ctx: &TxContext,
    ) -> Result<(), TransactionError> {
        let option = observed(apply_atomically(state, |state| {
            votes::add_vote(
                state,
                params.proposal_id,
                &ctx.signer_account_id,
                params.option,
            )
        }))?;
        log::debug!(
            "[Governance] {} voted {} on proposal {}",
            ctx.signer_account_id,
            option,
            params.proposal_id
        );
        governance_metrics().inc_votes(&option.to_string());
        Ok(())
    }

    /// Refunds every deposit on a proposal from custody and deletes the records.
    ///
    /// Idempotent. Returns the refunded amount.
    pub fn refund_deposits(
        &self,
        state: &mut dyn StateAccess,
        proposal_id: u64,
    ) -> Result<u64, TransactionError> {
        observed(apply_atomically(state, |state| {
            deposits::refund_deposits(state, &*self.bank, &self.module_account, proposal_id)
        }))
    }

    /// Deletes every deposit on a proposal without refunding, handling the
    /// funds per the configured forfeiture mode. Returns the forfeited amount.
    pub fn delete_deposits(
        &self,
        state: &mut dyn StateAccess,
        proposal_id: u64,
    ) -> Result<u64, TransactionError> {
        observed(apply_atomically(state, |state| {
            deposits::delete_deposits(
                state,
                &*self.bank,
                &self.module_account,
                proposal_id,
                self.params.forfeiture,
            )
        }))
    }

    /// Moves a proposal from its deposit period into its voting period.
    fn activate(
        &self,
        state: &mut dyn StateAccess,
        mut proposal: Proposal,
        now: u64,
    ) -> Result<(), TransactionError> {
        store::dequeue(
            state,
            GOVERNANCE_DEPOSIT_QUEUE_PREFIX,
            proposal.deposit_end_time,
            proposal.id,
        )?;
        proposal.status = ProposalStatus::VotingPeriod;
        proposal.voting_start_time = now;
        proposal.voting_end_time = store::add_time(now, self.params.voting_period_secs)?;
        store::save_proposal(state, &proposal)?;
        store::enqueue(
            state,
            GOVERNANCE_VOTING_QUEUE_PREFIX,
            proposal.voting_end_time,
            proposal.id,
        )?;
        log::info!(
            "[Governance] proposal {} entered voting period, ends at {}",
            proposal.id,
            proposal.voting_end_time
        );
        Ok(())
    }

    // --- Queries ---

    /// Tallies a proposal's current votes without changing state.
    pub fn tally(
        &self,
        state: &dyn StateAccess,
        proposal_id: u64,
    ) -> Result<TallyVerdict, TransactionError> {
        store::require_proposal(state, proposal_id)?;
        Ok(tally::tally(state, &*self.power, &self.params, proposal_id)?)
    }

    /// Looks up a proposal.
    pub fn get_proposal(
        &self,
        state: &dyn StateAccess,
        proposal_id: u64,
    ) -> Result<Option<Proposal>, StateError> {
        store::get_proposal(state, proposal_id)
    }

    /// Lists proposals in ID order, optionally only those with `status`.
    pub fn get_proposals(
        &self,
        state: &dyn StateAccess,
        status: Option<ProposalStatus>,
    ) -> Result<Vec<Proposal>, StateError> {
        let mut proposals = store::all_proposals(state)?;
        if let Some(status) = status {
            proposals.retain(|p| p.status == status);
        }
        Ok(proposals)
    }

    /// Looks up one depositor's deposit on a proposal.
    pub fn get_deposit(
        &self,
        state: &dyn StateAccess,
        proposal_id: u64,
        depositor: &AccountId,
    ) -> Result<Option<Deposit>, StateError> {
        deposits::get_deposit(state, proposal_id, depositor)
    }

    /// Lists a proposal's deposits, ordered by depositor.
    pub fn get_deposits(
        &self,
        state: &dyn StateAccess,
        proposal_id: u64,
    ) -> Result<Vec<Deposit>, StateError> {
        deposits::get_deposits(state, proposal_id)
    }

    /// Lists every live deposit, ordered by proposal ID, then depositor.
    pub fn get_all_deposits(&self, state: &dyn StateAccess) -> Result<Vec<Deposit>, StateError> {
        deposits::get_all_deposits(state)
    }

    /// Looks up one voter's vote on a proposal.
    pub fn get_vote(
        &self,
        state: &dyn StateAccess,
        proposal_id: u64,
        voter: &AccountId,
    ) -> Result<Option<Vote>, StateError> {
        votes::get_vote(state, proposal_id, voter)
    }

    /// Lists a proposal's votes, ordered by voter.
    pub fn get_votes(
        &self,
        state: &dyn StateAccess,
        proposal_id: u64,
    ) -> Result<Vec<Vote>, StateError> {
        votes::get_votes(state, proposal_id)
    }

    // --- Block lifecycle ---

    /// Resolves every proposal whose deposit or voting deadline is at or
    /// before `ctx.block_timestamp`.
    ///
    /// The deposit sweep runs first, then the voting sweep; each visits
    /// proposals by end time, then ID. The whole sweep commits atomically.
    pub fn end_block(
        &self,
        state: &mut dyn StateAccess,
        ctx: &TxContext,
    ) -> Result<Vec<ProposalResolution>, TransactionError> {
        let _timer = Timer::new(governance_metrics());
        let now = ctx.block_timestamp;
        let resolutions = observed(apply_atomically(state, |state| {
            let mut resolutions = Vec::new();

            let expired = store::due(state, GOVERNANCE_DEPOSIT_QUEUE_PREFIX, now)?;
            log::debug!(
                "[Governance] end_block at {}: {} deposit periods expired",
                now,
                expired.len()
            );
            for (end_time, id) in expired {
                store::dequeue(state, GOVERNANCE_DEPOSIT_QUEUE_PREFIX, end_time, id)?;
                if let Some(resolution) = self.expire_deposit_period(state, id, now)? {
                    resolutions.push(resolution);
                }
            }

            let ended = store::due(state, GOVERNANCE_VOTING_QUEUE_PREFIX, now)?;
            log::debug!(
                "[Governance] end_block at {}: {} voting periods ended",
                now,
                ended.len()
            );
            for (end_time, id) in ended {
                store::dequeue(state, GOVERNANCE_VOTING_QUEUE_PREFIX, end_time, id)?;
                if let Some(resolution) = self.resolve_voting_period(state, id, ctx)? {
                    resolutions.push(resolution);
                }
            }
            Ok(resolutions)
        }))?;

        for resolution in &resolutions {
            governance_metrics().inc_resolutions(&resolution.status.to_string());
        }
        Ok(resolutions)
    }

    fn expire_deposit_period(
        &self,
        state: &mut dyn StateAccess,
        id: u64,
        now: u64,
    ) -> Result<Option<ProposalResolution>, TransactionError> {
        let Some(mut proposal) = store::get_proposal(state, id)? else {
            log::warn!("[Governance] deposit queue referenced missing proposal {}", id);
            return Ok(None);
        };
        if proposal.status != ProposalStatus::DepositPeriod {
            log::warn!(
                "[Governance] skipping queued proposal {} in status {}",
                id,
                proposal.status
            );
            return Ok(None);
        }
        // Only an underfunded proposal expires. One that already holds the
        // minimum (the minimum was lowered after it was queued) opens instead.
        if proposal.total_deposit >= self.params.min_deposit {
            log::warn!(
                "[Governance] proposal {} reached its deposit deadline holding {} of the {} minimum; opening its voting period",
                id,
                proposal.total_deposit,
                self.params.min_deposit
            );
            self.activate(state, proposal, now)?;
            return Ok(None);
        }

        deposits::dispose(
            state,
            &*self.bank,
            &self.module_account,
            id,
            self.params.deposit_policy.on_expiry,
            self.params.forfeiture,
        )?;
        // Reload: disposal zeroes the total.
        proposal = store::require_proposal(state, id)?;
        proposal.status = ProposalStatus::Failed;
        store::save_proposal(state, &proposal)?;
        log::info!(
            "[Governance] proposal {} failed: deposit period ended below the minimum deposit",
            id
        );
        Ok(Some(ProposalResolution {
            proposal_id: id,
            status: ProposalStatus::Failed,
            outcome: None,
        }))
    }

    fn resolve_voting_period(
        &self,
        state: &mut dyn StateAccess,
        id: u64,
        ctx: &TxContext,
    ) -> Result<Option<ProposalResolution>, TransactionError> {
        let Some(proposal) = store::get_proposal(state, id)? else {
            log::warn!("[Governance] voting queue referenced missing proposal {}", id);
            return Ok(None);
        };
        if proposal.status != ProposalStatus::VotingPeriod {
            log::warn!(
                "[Governance] skipping queued proposal {} in status {}",
                id,
                proposal.status
            );
            return Ok(None);
        }

        let verdict = tally::tally(state, &*self.power, &self.params, id)?;
        votes::delete_votes(state, id)?;

        let policy = &self.params.deposit_policy;
        let (disposition, mut status) = match verdict.outcome {
            TallyOutcome::Passed => (policy.on_pass, ProposalStatus::Passed),
            TallyOutcome::Vetoed => (policy.on_veto, ProposalStatus::Rejected),
            TallyOutcome::Rejected => (policy.on_reject, ProposalStatus::Rejected),
            TallyOutcome::NoQuorum => (policy.on_no_quorum, ProposalStatus::Failed),
        };
        deposits::dispose(
            state,
            &*self.bank,
            &self.module_account,
            id,
            disposition,
            self.params.forfeiture,
        )?;

        if verdict.passed() {
            let content = proposal.content.clone();
            let executed =
                apply_atomically(state, |inner| self.handler.execute(inner, &content, ctx));
            if let Err(e) = executed {
                log::warn!("[Governance] proposal {} passed but failed to execute: {}", id, e);
                status = ProposalStatus::Failed;
            }
        }

        let mut proposal = store::require_proposal(state, id)?;
        proposal.status = status;
        proposal.final_tally_result = Some(verdict.result);
        store::save_proposal(state, &proposal)?;
        log::info!(
            "[Governance] proposal {} resolved as {} ({:?})",
            id,
            status,
            verdict.outcome
        );
        Ok(Some(ProposalResolution {
            proposal_id: id,
            status,
            outcome: Some(verdict.outcome),
        }))
    }

    // --- Genesis ---

    /// Imports a genesis section. See [`GovernanceGenesis`].
    pub fn init_genesis(
        &self,
        state: &mut dyn StateAccess,
        genesis: &GovernanceGenesis,
    ) -> Result<(), TransactionError> {
        observed(apply_atomically(state, |state| {
            genesis::init_genesis(
                state,
                &*self.bank,
                &self.module_account,
                self.params.min_deposit,
                genesis,
            )
        }))
    }

    /// Exports the complete governance state.
    pub fn export_genesis(&self, state: &dyn StateAccess) -> Result<GovernanceGenesis, StateError> {
        genesis::export_genesis(state)
    }

    // --- Dispatch ---

    /// Dispatches a SCALE-encoded call by method name and returns the
    /// SCALE-encoded result.
    pub fn handle_call(
        &self,
        state: &mut dyn StateAccess,
        method: &str,
        params: &[u8],
        ctx: &TxContext,
    ) -> Result<Vec<u8>, TransactionError> {
        fn decode<T: Decode>(bytes: &[u8]) -> Result<T, TransactionError> {
            codec::from_bytes_canonical(bytes).map_err(TransactionError::Deserialization)
        }
        fn encode<T: Encode>(value: &T) -> Result<Vec<u8>, TransactionError> {
            codec::to_bytes_canonical(value).map_err(TransactionError::Serialization)
        }

        match method {
            "submit_proposal@v1" => encode(&self.submit_proposal(state, decode(params)?, ctx)?),
            "deposit@v1" => encode(&self.deposit(state, decode(params)?, ctx)?),
            "vote@v1" => encode(&self.vote(state, decode(params)?, ctx)?),
            other => observed(Err(TransactionError::Deserialization(format!(
                "unknown governance method: {}",
                other
            )))),
        }
    }
}

impl OnEndBlock for GovernanceModule {
    fn on_end_block(&self, state: &mut dyn StateAccess, ctx: &TxContext) -> Result<(), StateError> {
        self.end_block(state, ctx)
            .map(|_| ())
            .map_err(into_state_error)
    }
}
