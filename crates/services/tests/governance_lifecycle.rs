// Path: crates/services/tests/governance_lifecycle.rs
//! End-to-end proposal lifecycles driven through deposits, votes, and end-block sweeps.

use agora_api::prelude::*;
use agora_services::bank::StateBank;
use agora_services::governance::{
    DepositParams, GovernanceGenesis, GovernanceModule, ProposalResolution, ProposalRouter,
    SubmitProposalParams, TallyOutcome, VoteParams,
};
use agora_services::staking::ValidatorSetPower;
use agora_state::memory::MemoryStateManager;
use agora_test_utils::fixtures::{
    account, ctx_at, genesis_state, test_params, text_content, TEST_DEPOSIT_PERIOD,
    TEST_VOTING_PERIOD,
};
use agora_test_utils::{assert_governance_err, assert_ok};
use agora_types::prelude::*;
use agora_types::service_configs::GovernanceParams;
use std::sync::Arc;

const T0: u64 = 1_700_000_000;
const FUNDS: u64 = 10_000;

struct Harness {
    gov: GovernanceModule,
    state: MemoryStateManager,
    bank: StateBank,
}

impl Harness {
    fn new(params: GovernanceParams, weights: &[(AccountId, u64)]) -> Self {
        let balances: Vec<_> = (1..=5).map(|n| (account(n), FUNDS)).collect();
        let state = genesis_state(&balances, weights).unwrap();
        let gov = GovernanceModule::new(
            params,
            Arc::new(StateBank::new()),
            Arc::new(ValidatorSetPower::new()),
        );
        Self {
            gov,
            state,
            bank: StateBank::new(),
        }
    }

    fn submit(&mut self, content: ProposalContent, initial_deposit: u64) -> u64 {
        assert_ok!(self.gov.submit_proposal(
            &mut self.state,
            SubmitProposalParams {
                content,
                initial_deposit,
            },
            &ctx_at(T0, account(1)),
        ))
    }

    fn deposit(&mut self, id: u64, who: u8, amount: u64) -> Result<bool, TransactionError> {
        self.gov.deposit(
            &mut self.state,
            DepositParams {
                proposal_id: id,
                amount,
            },
            &ctx_at(T0, account(who)),
        )
    }

    fn vote(&mut self, id: u64, who: u8, option: VoteOption) {
        assert_ok!(self.gov.vote(
            &mut self.state,
            VoteParams {
                proposal_id: id,
                option: option.tag(),
            },
            &ctx_at(T0 + 1, account(who)),
        ));
    }

    fn end_block(&mut self, time: u64) -> Vec<ProposalResolution> {
        assert_ok!(self
            .gov
            .end_block(&mut self.state, &ctx_at(time, *self.gov.module_account())))
    }

    fn status(&self, id: u64) -> ProposalStatus {
        self.gov.get_proposal(&self.state, id).unwrap().unwrap().status
    }

    fn balance(&self, who: &AccountId) -> u64 {
        self.bank.balance(&self.state, who).unwrap()
    }

    fn custody(&self) -> u64 {
        self.balance(self.gov.module_account())
    }
}

fn two_validators() -> Vec<(AccountId, u64)> {
    vec![(account(1), 60), (account(2), 40)]
}

#[test]
fn test_deposits_of_700_then_400_cross_a_1000_minimum() {
    let mut h = Harness::new(test_params(1000), &two_validators());
    let id = h.submit(text_content("Fund"), 0);

    assert!(!assert_ok!(h.deposit(id, 1, 700)));
    assert_eq!(h.gov.get_proposal(&h.state, id).unwrap().unwrap().total_deposit, 700);
    assert!(assert_ok!(h.deposit(id, 2, 400)));
    assert_eq!(h.gov.get_proposal(&h.state, id).unwrap().unwrap().total_deposit, 1100);
    assert_eq!(h.status(id), ProposalStatus::VotingPeriod);
}

#[test]
fn test_single_voter_with_all_power_passes_and_is_refunded() {
    let mut h = Harness::new(test_params(1000), &[(account(3), 100)]);
    let id = h.submit(text_content("Signal"), 1000);
    assert_eq!(h.balance(&account(1)), FUNDS - 1000);
    h.vote(id, 3, VoteOption::Yes);

    // Nothing resolves before the deadline.
    assert!(h.end_block(T0 + TEST_VOTING_PERIOD - 1).is_empty());

    let resolutions = h.end_block(T0 + TEST_VOTING_PERIOD);
    assert_eq!(
        resolutions,
        vec![ProposalResolution {
            proposal_id: id,
            status: ProposalStatus::Passed,
            outcome: Some(TallyOutcome::Passed),
        }]
    );
    let p = h.gov.get_proposal(&h.state, id).unwrap().unwrap();
    assert_eq!(p.status, ProposalStatus::Passed);
    assert_eq!(p.final_tally_result.unwrap().yes, Decimal::ONE);
    assert_eq!(h.balance(&account(1)), FUNDS);
    assert_eq!(h.custody(), 0);
}

#[test]
fn test_veto_above_a_third_rejects_and_forfeits() {
    let params = GovernanceParams {
        veto_threshold: Threshold::new(1, 3),
        ..test_params(1000)
    };
    let mut h = Harness::new(params, &two_validators());
    let id = h.submit(text_content("Contested"), 1000);
    h.vote(id, 1, VoteOption::Yes);
    h.vote(id, 2, VoteOption::NoWithVeto);

    let resolutions = h.end_block(T0 + TEST_VOTING_PERIOD);
    assert_eq!(resolutions[0].outcome, Some(TallyOutcome::Vetoed));
    assert_eq!(h.status(id), ProposalStatus::Rejected);
    assert!(h.gov.get_deposits(&h.state, id).unwrap().is_empty());
    // Burned by default: neither refunded nor left in custody.
    assert_eq!(h.balance(&account(1)), FUNDS - 1000);
    assert_eq!(h.custody(), 0);
}

#[test]
fn test_veto_of_exactly_a_third_does_not_veto() {
    let params = GovernanceParams::from_toml_str(
        r#"
        min_deposit = 1000
        deposit_period_secs = 172800
        voting_period_secs = 172800
        veto_threshold = "1/3"
        "#,
    )
    .unwrap();
    assert_eq!(params.veto_threshold, Threshold::new(1, 3));
    let mut h = Harness::new(params, &[(account(1), 200), (account(2), 100)]);
    let id = h.submit(text_content("Borderline"), 1000);
    h.vote(id, 1, VoteOption::Yes);
    h.vote(id, 2, VoteOption::NoWithVeto);

    let resolutions = h.end_block(T0 + 172800);
    assert_eq!(resolutions[0].outcome, Some(TallyOutcome::Passed));
    assert_eq!(h.status(id), ProposalStatus::Passed);
    assert_eq!(h.balance(&account(1)), FUNDS);
}

#[test]
fn test_plain_rejection_refunds() {
    let mut h = Harness::new(test_params(1000), &two_validators());
    let id = h.submit(text_content("Unpopular"), 1000);
    h.vote(id, 1, VoteOption::No);
    h.vote(id, 2, VoteOption::Yes);

    h.end_block(T0 + TEST_VOTING_PERIOD);
    assert_eq!(h.status(id), ProposalStatus::Rejected);
    assert_eq!(h.balance(&account(1)), FUNDS);
}

#[test]
fn test_missing_quorum_fails_and_refunds() {
    let mut h = Harness::new(test_params(1000), &[(account(1), 10), (account(2), 90)]);
    let id = h.submit(text_content("Quiet"), 1000);
    h.vote(id, 1, VoteOption::Yes);

    let resolutions = h.end_block(T0 + TEST_VOTING_PERIOD);
    assert_eq!(resolutions[0].outcome, Some(TallyOutcome::NoQuorum));
    assert_eq!(h.status(id), ProposalStatus::Failed);
    assert_eq!(h.balance(&account(1)), FUNDS);
    let tally = h.gov.get_proposal(&h.state, id).unwrap().unwrap().final_tally_result.unwrap();
    assert_eq!(tally.yes, Decimal::percent(10));
}

#[test]
fn test_expired_deposit_period_fails_without_refund() {
    let mut h = Harness::new(test_params(1000), &two_validators());
    let id = h.submit(text_content("Underfunded"), 0);
    assert_ok!(h.deposit(id, 2, 300));

    assert!(h.end_block(T0 + TEST_DEPOSIT_PERIOD - 1).is_empty());
    let resolutions = h.end_block(T0 + TEST_DEPOSIT_PERIOD);
    assert_eq!(
        resolutions,
        vec![ProposalResolution {
            proposal_id: id,
            status: ProposalStatus::Failed,
            outcome: None,
        }]
    );
    assert!(h.gov.get_all_deposits(&h.state).unwrap().is_empty());
    assert_eq!(h.balance(&account(2)), FUNDS - 300);

    // Terminal states are final.
    assert_governance_err!(
        h.deposit(id, 2, 1000),
        GovernanceError::ProposalNotInDepositPeriod(_)
    );
    assert!(h.end_block(T0 + 10 * TEST_DEPOSIT_PERIOD).is_empty());
    assert_eq!(h.status(id), ProposalStatus::Failed);
}

#[test]
fn test_funded_proposal_at_its_deposit_deadline_opens_instead_of_expiring() {
    let mut h = Harness::new(test_params(1000), &two_validators());
    let id = h.submit(text_content("Funded late"), 600);

    // The minimum is lowered while the proposal waits in its deposit period.
    h.gov = GovernanceModule::new(
        test_params(500),
        Arc::new(StateBank::new()),
        Arc::new(ValidatorSetPower::new()),
    );
    assert!(h.end_block(T0 + TEST_DEPOSIT_PERIOD).is_empty());

    let p = h.gov.get_proposal(&h.state, id).unwrap().unwrap();
    assert_eq!(p.status, ProposalStatus::VotingPeriod);
    assert_eq!(p.total_deposit, 600);
    assert_eq!(p.voting_start_time, T0 + TEST_DEPOSIT_PERIOD);
    assert_eq!(h.gov.get_deposits(&h.state, id).unwrap().len(), 1);
    assert_eq!(h.balance(&account(1)), FUNDS - 600);
    assert_eq!(h.custody(), 600);

    h.vote(id, 1, VoteOption::Yes);
    let resolutions = h.end_block(T0 + TEST_DEPOSIT_PERIOD + TEST_VOTING_PERIOD);
    assert_eq!(resolutions[0].status, ProposalStatus::Passed);
    assert_eq!(h.balance(&account(1)), FUNDS);
}

#[test]
fn test_votes_cannot_be_cast_after_resolution() {
    let mut h = Harness::new(test_params(0), &two_validators());
    let id = h.submit(text_content("Closed"), 0);
    h.end_block(T0 + TEST_VOTING_PERIOD);
    assert_governance_err!(
        h.gov.vote(
            &mut h.state,
            VoteParams {
                proposal_id: id,
                option: VoteOption::Yes.tag(),
            },
            &ctx_at(T0 + TEST_VOTING_PERIOD, account(1)),
        ),
        GovernanceError::InactiveProposal(_)
    );
}

#[test]
fn test_proposals_resolve_in_end_time_then_id_order() {
    let mut h = Harness::new(test_params(0), &two_validators());
    let late = h.submit(text_content("First submitted"), 0);
    let early = assert_ok!(h.gov.submit_proposal(
        &mut h.state,
        SubmitProposalParams {
            content: text_content("Submitted earlier in time"),
            initial_deposit: 0,
        },
        &ctx_at(T0 - 10, account(2)),
    ));
    let same_time = h.submit(text_content("Same end as the first"), 0);

    let resolutions = h.end_block(T0 + TEST_VOTING_PERIOD);
    let order: Vec<u64> = resolutions.iter().map(|r| r.proposal_id).collect();
    assert_eq!(order, vec![early, late, same_time]);
}

#[test]
fn test_deposit_sweep_runs_before_voting_sweep() {
    let mut h = Harness::new(test_params(500), &two_validators());
    let voting = h.submit(text_content("Funded"), 500);
    let expiring = h.submit(text_content("Unfunded"), 0);

    let resolutions = h.end_block(T0 + TEST_VOTING_PERIOD.max(TEST_DEPOSIT_PERIOD));
    let order: Vec<u64> = resolutions.iter().map(|r| r.proposal_id).collect();
    assert_eq!(order, vec![expiring, voting]);
}

struct FailingHandler;

impl ProposalHandler for FailingHandler {
    fn validate(&self, _content: &ProposalContent) -> Result<(), GovernanceError> {
        Ok(())
    }

    fn execute(
        &self,
        state: &mut dyn StateAccess,
        _content: &ProposalContent,
        _ctx: &TxContext,
    ) -> Result<(), TransactionError> {
        state.insert(b"treasury::spent", b"1")?;
        Err(GovernanceError::ProposalExecution("treasury is locked".into()).into())
    }
}

struct MarkingHandler;

impl ProposalHandler for MarkingHandler {
    fn validate(&self, content: &ProposalContent) -> Result<(), GovernanceError> {
        if content.payload.is_empty() {
            return Err(GovernanceError::InvalidProposalContent("empty payload".into()));
        }
        Ok(())
    }

    fn execute(
        &self,
        state: &mut dyn StateAccess,
        content: &ProposalContent,
        _ctx: &TxContext,
    ) -> Result<(), TransactionError> {
        state.insert(b"marker", &content.payload)?;
        Ok(())
    }
}

fn custom(route: &str, payload: &[u8]) -> ProposalContent {
    ProposalContent {
        proposal_type: ProposalType::Custom(route.into()),
        payload: payload.to_vec(),
        ..text_content(route)
    }
}

#[test]
fn test_passed_proposal_executes_its_handler() {
    let mut h = Harness::new(test_params(0), &two_validators());
    let router = ProposalRouter::default().with_route("mark", Arc::new(MarkingHandler));
    h.gov = h.gov.clone().with_handler(Arc::new(router));

    assert_governance_err!(
        h.gov.submit_proposal(
            &mut h.state,
            SubmitProposalParams {
                content: custom("mark", b""),
                initial_deposit: 0,
            },
            &ctx_at(T0, account(1)),
        ),
        GovernanceError::InvalidProposalContent(_)
    );

    let id = h.submit(custom("mark", b"hello"), 0);
    h.vote(id, 1, VoteOption::Yes);
    h.end_block(T0 + TEST_VOTING_PERIOD);
    assert_eq!(h.status(id), ProposalStatus::Passed);
    assert_eq!(h.state.get(b"marker").unwrap(), Some(b"hello".to_vec()));
}

#[test]
fn test_failed_execution_marks_the_proposal_failed_and_discards_its_writes() {
    let mut h = Harness::new(test_params(100), &two_validators());
    let router = ProposalRouter::default().with_route("spend", Arc::new(FailingHandler));
    h.gov = h.gov.clone().with_handler(Arc::new(router));

    let id = h.submit(custom("spend", b"100"), 100);
    h.vote(id, 1, VoteOption::Yes);
    let resolutions = h.end_block(T0 + TEST_VOTING_PERIOD);

    assert_eq!(resolutions[0].outcome, Some(TallyOutcome::Passed));
    assert_eq!(resolutions[0].status, ProposalStatus::Failed);
    assert_eq!(h.status(id), ProposalStatus::Failed);
    assert_eq!(h.state.get(b"treasury::spent").unwrap(), None);
    // Deposits follow the pass policy.
    assert_eq!(h.balance(&account(1)), FUNDS);
}

#[test]
fn test_unknown_route_is_rejected_at_submission() {
    let mut h = Harness::new(test_params(0), &two_validators());
    let err = h
        .gov
        .submit_proposal(
            &mut h.state,
            SubmitProposalParams {
                content: custom("nowhere", b"x"),
                initial_deposit: 0,
            },
            &ctx_at(T0, account(1)),
        )
        .unwrap_err();
    assert_eq!(
        err.as_governance(),
        Some(&GovernanceError::UnknownProposalRoute("nowhere".into()))
    );
}

#[test]
fn test_genesis_roundtrip_preserves_state_and_queues() {
    let mut h = Harness::new(test_params(1000), &two_validators());
    let deposit_period = h.submit(text_content("Pending"), 200);
    let voting = h.submit(text_content("Live"), 1000);
    h.vote(voting, 2, VoteOption::No);
    let passing = h.submit(text_content("Backed"), 1000);
    h.vote(passing, 1, VoteOption::Yes);

    let exported = h.gov.export_genesis(&h.state).unwrap();
    assert_eq!(exported.starting_proposal_id, passing + 1);
    assert_eq!(exported.proposals.len(), 3);
    assert_eq!(exported.votes.len(), 2);

    let json = exported.to_json().unwrap();
    let imported = GovernanceGenesis::from_json(&json).unwrap();
    assert_eq!(imported, exported);

    // A fresh chain holding the custody funds.
    let mut fresh = Harness::new(test_params(1000), &two_validators());
    fresh
        .bank
        .mint(&mut fresh.state, fresh.gov.module_account(), h.custody())
        .unwrap();
    assert_ok!(fresh.gov.init_genesis(&mut fresh.state, &imported));
    assert_eq!(fresh.gov.export_genesis(&fresh.state).unwrap(), exported);

    // Queues were rebuilt: both sweeps fire on the imported chain.
    let resolutions = fresh.end_block(T0 + TEST_VOTING_PERIOD.max(TEST_DEPOSIT_PERIOD));
    let statuses: Vec<_> = resolutions.iter().map(|r| (r.proposal_id, r.status)).collect();
    assert_eq!(
        statuses,
        vec![
            (deposit_period, ProposalStatus::Failed),
            (voting, ProposalStatus::Rejected),
            (passing, ProposalStatus::Passed),
        ]
    );
}

#[test]
fn test_genesis_rejects_uncovered_or_inconsistent_deposits() {
    let mut h = Harness::new(test_params(1000), &two_validators());
    h.submit(text_content("Pending"), 200);
    let exported = h.gov.export_genesis(&h.state).unwrap();

    // No custody funds on the fresh chain.
    let mut fresh = Harness::new(test_params(1000), &two_validators());
    assert_governance_err!(
        fresh.gov.init_genesis(&mut fresh.state, &exported),
        GovernanceError::GenesisMismatch(_)
    );
    assert!(fresh.gov.get_proposals(&fresh.state, None).unwrap().is_empty());

    let mut broken = exported.clone();
    broken.proposals[0].total_deposit = 999;
    assert_governance_err!(
        fresh.gov.init_genesis(&mut fresh.state, &broken),
        GovernanceError::GenesisMismatch(_)
    );

    let mut reused = exported;
    reused.starting_proposal_id = reused.proposals[0].id;
    assert_governance_err!(
        fresh.gov.init_genesis(&mut fresh.state, &reused),
        GovernanceError::GenesisMismatch(_)
    );
}

#[test]
fn test_genesis_rejects_a_deposit_period_proposal_that_meets_the_minimum() {
    let mut h = Harness::new(test_params(1000), &two_validators());
    h.submit(text_content("Pending"), 200);
    let exported = h.gov.export_genesis(&h.state).unwrap();

    let mut fresh = Harness::new(test_params(200), &two_validators());
    fresh
        .bank
        .mint(&mut fresh.state, fresh.gov.module_account(), 200)
        .unwrap();
    assert_governance_err!(
        fresh.gov.init_genesis(&mut fresh.state, &exported),
        GovernanceError::GenesisMismatch(_)
    );
    assert!(fresh.gov.get_proposals(&fresh.state, None).unwrap().is_empty());

    // One unit short of the minimum is a consistent deposit period.
    let mut below = Harness::new(test_params(201), &two_validators());
    below
        .bank
        .mint(&mut below.state, below.gov.module_account(), 200)
        .unwrap();
    assert_ok!(below.gov.init_genesis(&mut below.state, &exported));
}

#[test]
fn test_params_from_toml_drive_the_engine() {
    let params = GovernanceParams::from_toml_str(
        r#"
        min_deposit = 10
        deposit_period_secs = 50
        voting_period_secs = 60
        quorum = "0.5"
        forfeiture = "retain"

        [deposit_policy]
        on_expiry = "forfeit"
        "#,
    )
    .unwrap();
    let mut h = Harness::new(params, &two_validators());
    let id = h.submit(text_content("Configured"), 5);
    h.end_block(T0 + 50);
    assert_eq!(h.status(id), ProposalStatus::Failed);
    // Retained in custody rather than burned.
    assert_eq!(h.custody(), 5);
}
