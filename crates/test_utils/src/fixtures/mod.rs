// Path: crates/test_utils/src/fixtures/mod.rs
//! State and parameter fixtures for governance tests.

use agora_api::state::StateAccess;
use agora_api::transaction::context::TxContext;
use agora_state::memory::MemoryStateManager;
use agora_types::app::{write_validator_set, AccountId, ProposalContent, Threshold, ValidatorSet};
use agora_types::codec;
use agora_types::error::StateError;
use agora_types::keys::{balance_key, VALIDATOR_SET_KEY};
use agora_types::service_configs::GovernanceParams;

/// Deposit period used by [`test_params`].
pub const TEST_DEPOSIT_PERIOD: u64 = 100;
/// Voting period used by [`test_params`].
pub const TEST_VOTING_PERIOD: u64 = 100;

/// A deterministic account whose id is 32 copies of `n`.
pub fn account(n: u8) -> AccountId {
    AccountId([n; 32])
}

/// A text proposal with a non-empty description.
pub fn text_content(title: &str) -> ProposalContent {
    ProposalContent::text(title, format!("{title}: description"))
}

/// Default parameters with short periods and the given minimum deposit.
pub fn test_params(min_deposit: u64) -> GovernanceParams {
    GovernanceParams {
        min_deposit,
        deposit_period_secs: TEST_DEPOSIT_PERIOD,
        voting_period_secs: TEST_VOTING_PERIOD,
        quorum: Threshold::new(334, 1000),
        threshold: Threshold::percent(50),
        veto_threshold: Threshold::new(334, 1000),
        ..GovernanceParams::default()
    }
}

/// A transaction context at `time`, with height derived from it.
pub fn ctx_at(time: u64, signer: AccountId) -> TxContext {
    TxContext::new(time / 5 + 1, time, signer)
}

/// Writes a balance in the layout the state-backed bank reads.
pub fn set_balance(
    state: &mut dyn StateAccess,
    account: &AccountId,
    amount: u64,
) -> Result<(), StateError> {
    let bytes = codec::to_bytes_canonical(&amount).map_err(StateError::InvalidValue)?;
    state.insert(&balance_key(account), &bytes)
}

/// Stores a validator set built from `(account, weight)` pairs.
pub fn set_validators(
    state: &mut dyn StateAccess,
    weights: &[(AccountId, u64)],
) -> Result<(), StateError> {
    let set = ValidatorSet::from_weights(weights.iter().copied())?;
    state.insert(VALIDATOR_SET_KEY, &write_validator_set(&set)?)
}

/// A fresh state holding the given balances and validator weights.
pub fn genesis_state(
    balances: &[(AccountId, u64)],
    weights: &[(AccountId, u64)],
) -> Result<MemoryStateManager, StateError> {
    let mut state = MemoryStateManager::new();
    for (account, amount) in balances {
        set_balance(&mut state, account, *amount)?;
    }
    if !weights.is_empty() {
        set_validators(&mut state, weights)?;
    }
    Ok(state)
}
