// Path: crates/services/tests/governance_properties.rs
//! Property tests over the public governance API.

use agora_api::bank::BankKeeper;
use agora_services::bank::StateBank;
use agora_services::governance::{DepositParams, GovernanceModule, SubmitProposalParams, VoteParams};
use agora_services::staking::ValidatorSetPower;
use agora_state::prelude::*;
use agora_test_utils::fixtures::{account, ctx_at, genesis_state, test_params, text_content};
use agora_types::app::{AccountId, VoteOption};
use proptest::prelude::*;
use std::sync::Arc;

const T0: u64 = 1_000;
const FUNDS: u64 = 10_000;

fn module(min_deposit: u64) -> GovernanceModule {
    GovernanceModule::new(
        test_params(min_deposit),
        Arc::new(StateBank::new()),
        Arc::new(ValidatorSetPower::new()),
    )
}

fn funded_state(weights: &[(AccountId, u64)]) -> MemoryStateManager {
    let balances: Vec<_> = (1..=5).map(|n| (account(n), FUNDS)).collect();
    genesis_state(&balances, weights).unwrap()
}

fn option_strategy() -> impl Strategy<Value = VoteOption> {
    prop_oneof![
        Just(VoteOption::Yes),
        Just(VoteOption::Abstain),
        Just(VoteOption::No),
        Just(VoteOption::NoWithVeto),
    ]
}

fn cast(gov: &GovernanceModule, state: &mut MemoryStateManager, id: u64, who: u8, option: VoteOption) {
    gov.vote(
        state,
        VoteParams {
            proposal_id: id,
            option: option.tag(),
        },
        &ctx_at(T0, account(who)),
    )
    .unwrap();
}

proptest! {
    #[test]
    fn test_zero_power_votes_do_not_change_the_tally(
        weights in proptest::collection::vec(1u64..1_000, 3),
        options in proptest::collection::vec(option_strategy(), 3),
        powerless in proptest::collection::vec(option_strategy(), 2),
    ) {
        let weights: Vec<_> = weights
            .iter()
            .enumerate()
            .map(|(i, w)| (account(i as u8 + 1), *w))
            .collect();
        let mut state = funded_state(&weights);
        let gov = module(0);
        let id = gov
            .submit_proposal(
                &mut state,
                SubmitProposalParams { content: text_content("Prop"), initial_deposit: 0 },
                &ctx_at(T0, account(1)),
            )
            .unwrap();
        for (i, option) in options.iter().enumerate() {
            cast(&gov, &mut state, id, i as u8 + 1, *option);
        }
        let before = gov.tally(&state, id).unwrap();

        // Accounts 4 and 5 hold no voting power.
        for (i, option) in powerless.iter().enumerate() {
            cast(&gov, &mut state, id, i as u8 + 4, *option);
        }
        prop_assert_eq!(gov.get_votes(&state, id).unwrap().len(), 5);
        prop_assert_eq!(gov.tally(&state, id).unwrap(), before);
    }

    #[test]
    fn test_deposits_and_refunds_conserve_balances(
        deposits in proptest::collection::vec((1u8..=3, 1u64..4_000), 1..8),
    ) {
        let mut state = funded_state(&[(account(1), 1)]);
        let gov = module(1_000_000);
        let bank = StateBank::new();
        let id = gov
            .submit_proposal(
                &mut state,
                SubmitProposalParams { content: text_content("Fund"), initial_deposit: 0 },
                &ctx_at(T0, account(1)),
            )
            .unwrap();

        let supply = |state: &MemoryStateManager| -> u64 {
            (1..=3).map(|n| bank.balance(state, &account(n)).unwrap()).sum::<u64>()
                + bank.balance(state, gov.module_account()).unwrap()
        };

        let mut escrowed = 0u64;
        for (who, amount) in deposits {
            let before = state.clone();
            match gov.deposit(
                &mut state,
                DepositParams { proposal_id: id, amount },
                &ctx_at(T0 + 1, account(who)),
            ) {
                Ok(_) => escrowed += amount,
                Err(_) => prop_assert_eq!(&state, &before),
            }
            prop_assert_eq!(supply(&state), 3 * FUNDS);
            let total = gov.get_proposal(&state, id).unwrap().unwrap().total_deposit;
            prop_assert_eq!(total, escrowed);
        }

        prop_assert_eq!(gov.refund_deposits(&mut state, id).unwrap(), escrowed);
        for n in 1..=3 {
            prop_assert_eq!(bank.balance(&state, &account(n)).unwrap(), FUNDS);
        }
        prop_assert_eq!(bank.balance(&state, gov.module_account()).unwrap(), 0);
    }

    #[test]
    fn test_voting_period_opens_on_the_crossing_deposit(
        min_deposit in 1u64..5_000,
        deposits in proptest::collection::vec((1u8..=3, 1u64..1_500), 1..10),
    ) {
        let mut state = funded_state(&[(account(1), 1)]);
        let gov = module(min_deposit);
        let id = gov
            .submit_proposal(
                &mut state,
                SubmitProposalParams { content: text_content("Fund"), initial_deposit: 0 },
                &ctx_at(T0, account(1)),
            )
            .unwrap();

        let crossing = deposits
            .iter()
            .scan(0u64, |sum, (_, amount)| {
                *sum += amount;
                Some(*sum)
            })
            .position(|sum| sum >= min_deposit);

        let mut activations = Vec::new();
        for (i, (who, amount)) in deposits.iter().enumerate() {
            let result = gov.deposit(
                &mut state,
                DepositParams { proposal_id: id, amount: *amount },
                &ctx_at(T0 + 1, account(*who)),
            );
            match crossing {
                Some(c) if i > c => prop_assert!(result.is_err()),
                _ => {
                    if result.unwrap() {
                        activations.push(i);
                    }
                }
            }
        }
        prop_assert_eq!(activations.first().copied(), crossing);
        prop_assert!(activations.len() <= 1);
    }
}
