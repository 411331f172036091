// Path: crates/types/src/app/consensus.rs
//! The canonical validator set, the source of voting power for tallies.

use crate::app::AccountId;
use crate::codec;
use crate::error::StateError;
use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Current schema version of the stored validator set blob.
const VALIDATOR_SET_SCHEMA_VERSION: u16 = 1;

/// A versioned container for the validator set, as stored in state.
#[derive(Encode, Decode, Serialize, Deserialize, Debug, Clone)]
pub struct ValidatorSetBlob {
    /// The schema version of the payload.
    pub schema_version: u16,
    /// The validator set.
    pub payload: ValidatorSet,
}

/// The active validator set.
#[derive(Encode, Decode, Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatorSet {
    /// Sum of the weights of all non-jailed validators.
    /// This MUST equal the actual sum for the structure to be valid.
    pub total_weight: u64,
    /// The validators, sorted by `account_id` bytes.
    pub validators: Vec<Validator>,
}

/// A single validator within the set.
#[derive(Encode, Decode, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Validator {
    /// The validator's account.
    pub account_id: AccountId,
    /// Bonded weight.
    pub weight: u64,
    /// Jailed validators keep their bond but hold no voting power.
    #[serde(default)]
    pub jailed: bool,
}

impl ValidatorSet {
    /// Builds a set from `(account, weight)` pairs, computing the total.
    pub fn from_weights(weights: impl IntoIterator<Item = (AccountId, u64)>) -> Result<Self, StateError> {
        let validators = weights
            .into_iter()
            .map(|(account_id, weight)| Validator {
                account_id,
                weight,
                jailed: false,
            })
            .collect();
        let mut set = Self {
            total_weight: 0,
            validators,
        };
        set.recompute_total()?;
        Ok(set)
    }

    /// Recomputes `total_weight` from non-jailed validators.
    pub fn recompute_total(&mut self) -> Result<(), StateError> {
        self.total_weight = self
            .validators
            .iter()
            .filter(|v| !v.jailed)
            .try_fold(0u64, |acc, v| acc.checked_add(v.weight))
            .ok_or_else(|| StateError::InvalidValue("validator weight overflow".into()))?;
        Ok(())
    }

    /// Returns the effective voting weight of an account: zero if unknown or jailed.
    pub fn weight_of(&self, account: &AccountId) -> u64 {
        self.validators
            .binary_search_by(|v| v.account_id.cmp(account))
            .ok()
            .and_then(|i| self.validators.get(i))
            .filter(|v| !v.jailed)
            .map(|v| v.weight)
            .unwrap_or(0)
    }
}

/// Reads the validator set from its canonical stored form.
pub fn read_validator_set(bytes: &[u8]) -> Result<ValidatorSet, StateError> {
    let blob: ValidatorSetBlob =
        codec::from_bytes_canonical(bytes).map_err(StateError::Decode)?;
    if blob.schema_version != VALIDATOR_SET_SCHEMA_VERSION {
        return Err(StateError::Decode(format!(
            "unsupported validator set schema version {}",
            blob.schema_version
        )));
    }
    Ok(blob.payload)
}

/// Writes the validator set to its canonical stored form.
///
/// **Invariant:** validators are sorted by `account_id` and the total is
/// recomputed, so readers can binary-search and trust `total_weight`.
pub fn write_validator_set(set: &ValidatorSet) -> Result<Vec<u8>, StateError> {
    let mut sorted = set.clone();
    sorted.validators.sort_by(|a, b| a.account_id.cmp(&b.account_id));
    sorted.recompute_total()?;
    codec::to_bytes_canonical(&ValidatorSetBlob {
        schema_version: VALIDATOR_SET_SCHEMA_VERSION,
        payload: sorted,
    })
    .map_err(StateError::Decode)
}
