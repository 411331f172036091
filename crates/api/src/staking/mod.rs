// Path: crates/api/src/staking/mod.rs
//! Defines the `VotingPowerSource` trait consulted at tally time.

use crate::state::StateAccess;
use agora_types::app::AccountId;
use agora_types::error::StateError;

/// Supplies voting weight for a tally.
///
/// Weights are read when the tally runs, not when the vote was cast. Accounts
/// without power weigh zero. `total_weight` is the denominator for quorum.
pub trait VotingPowerSource: Send + Sync {
    /// The weight of a single account.
    fn weight_of(&self, state: &dyn StateAccess, account: &AccountId) -> Result<u64, StateError>;

    /// The sum of all weights that could vote.
    fn total_weight(&self, state: &dyn StateAccess) -> Result<u64, StateError>;
}
