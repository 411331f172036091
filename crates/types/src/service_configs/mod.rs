// Path: crates/types/src/service_configs/mod.rs
//! Configuration structures for the governance service.

use crate::app::Threshold;
use crate::error::ConfigError;
use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Two weeks, in seconds.
const DEFAULT_PERIOD_SECS: u64 = 14 * 24 * 60 * 60;

/// What happens to a proposal's deposits when it reaches a given outcome.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
#[serde(rename_all = "snake_case")]
pub enum DepositDisposition {
    /// Deposits are returned to their depositors.
    Refund,
    /// Deposits are kept by the module, see [`ForfeitureMode`].
    Forfeit,
}

/// What the module does with forfeited funds.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
#[serde(rename_all = "snake_case")]
pub enum ForfeitureMode {
    /// Forfeited funds stay in the custody account.
    Retain,
    /// Forfeited funds are destroyed.
    Burn,
}

/// Per-outcome deposit handling.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
#[serde(default)]
pub struct DepositPolicy {
    /// The proposal passed (including when its execution later failed).
    pub on_pass: DepositDisposition,
    /// The proposal was rejected without veto.
    pub on_reject: DepositDisposition,
    /// The proposal was vetoed.
    pub on_veto: DepositDisposition,
    /// The vote did not reach quorum.
    pub on_no_quorum: DepositDisposition,
    /// The deposit period expired before the minimum deposit was reached.
    pub on_expiry: DepositDisposition,
}

impl Default for DepositPolicy {
    fn default() -> Self {
        Self {
            on_pass: DepositDisposition::Refund,
            on_reject: DepositDisposition::Refund,
            on_veto: DepositDisposition::Forfeit,
            on_no_quorum: DepositDisposition::Refund,
            on_expiry: DepositDisposition::Forfeit,
        }
    }
}

/// Configuration parameters for the governance service.
///
/// Loadable from TOML; durations are in seconds of block time.
///
/// ```toml
/// min_deposit = 1000
/// deposit_period_secs = 86400
/// voting_period_secs = 86400
/// quorum = "0.334"
/// threshold = "0.5"
/// veto_threshold = "1/3"
/// forfeiture = "burn"
///
/// [deposit_policy]
/// on_no_quorum = "forfeit"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
#[serde(default)]
pub struct GovernanceParams {
    /// The minimum total deposit that moves a proposal into its voting period.
    pub min_deposit: u64,
    /// Length of the deposit period.
    pub deposit_period_secs: u64,
    /// Length of the voting period.
    pub voting_period_secs: u64,
    /// Minimum share of total voting power that must vote, in `[0, 1]`.
    pub quorum: Threshold,
    /// Share of non-abstaining power that must vote Yes to pass, in `(0, 1)`. Strictly exceeded.
    pub threshold: Threshold,
    /// Share of cast power voting NoWithVeto that vetoes, in `(0, 1)`. Strictly exceeded.
    pub veto_threshold: Threshold,
    /// Deposit handling per outcome.
    pub deposit_policy: DepositPolicy,
    /// What forfeiting does with the funds.
    pub forfeiture: ForfeitureMode,
}

impl Default for GovernanceParams {
    fn default() -> Self {
        Self {
            min_deposit: 512,
            deposit_period_secs: DEFAULT_PERIOD_SECS,
            voting_period_secs: DEFAULT_PERIOD_SECS,
            quorum: Threshold::new(334, 1000),
            threshold: Threshold::percent(50),
            veto_threshold: Threshold::new(334, 1000),
            deposit_policy: DepositPolicy::default(),
            forfeiture: ForfeitureMode::Burn,
        }
    }
}

impl GovernanceParams {
    /// Parses and validates parameters from a TOML document. Missing keys take defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let params: Self = toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    /// Checks every parameter against its allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.deposit_period_secs == 0 {
            return Err(ConfigError::InvalidParam {
                name: "deposit_period_secs",
                reason: "must be positive".into(),
            });
        }
        if self.voting_period_secs == 0 {
            return Err(ConfigError::InvalidParam {
                name: "voting_period_secs",
                reason: "must be positive".into(),
            });
        }
        if !self.quorum.is_unit_interval() {
            return Err(ConfigError::InvalidParam {
                name: "quorum",
                reason: format!("{} is not within [0, 1]", self.quorum),
            });
        }
        if !self.threshold.is_open_unit_interval() {
            return Err(ConfigError::InvalidParam {
                name: "threshold",
                reason: format!("{} is not within (0, 1)", self.threshold),
            });
        }
        if !self.veto_threshold.is_open_unit_interval() {
            return Err(ConfigError::InvalidParam {
                name: "veto_threshold",
                reason: format!("{} is not within (0, 1)", self.veto_threshold),
            });
        }
        Ok(())
    }
}
