// Path: crates/services/src/staking/mod.rs
//! Voting power read from the stored validator set.

use agora_api::staking::VotingPowerSource;
use agora_api::state::StateAccess;
use agora_types::app::{read_validator_set, AccountId, ValidatorSet};
use agora_types::error::StateError;
use agora_types::keys::VALIDATOR_SET_KEY;

/// Weighs each account by its bonded validator weight.
///
/// Jailed validators and unknown accounts weigh zero. A missing validator set
/// means nobody holds power.
#[derive(Debug, Default, Clone, Copy)]
pub struct ValidatorSetPower;

impl ValidatorSetPower {
    /// Creates the source.
    pub fn new() -> Self {
        Self
    }

    /// Loads the current validator set.
    pub fn load(state: &dyn StateAccess) -> Result<ValidatorSet, StateError> {
        match state.get(VALIDATOR_SET_KEY)? {
            Some(bytes) => read_validator_set(&bytes),
            None => Ok(ValidatorSet::default()),
        }
    }
}

impl VotingPowerSource for ValidatorSetPower {
    fn weight_of(&self, state: &dyn StateAccess, account: &AccountId) -> Result<u64, StateError> {
        Ok(Self::load(state)?.weight_of(account))
    }

    fn total_weight(&self, state: &dyn StateAccess) -> Result<u64, StateError> {
        Ok(Self::load(state)?.total_weight)
    }
}
