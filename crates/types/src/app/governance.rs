// Path: crates/types/src/app/governance.rs
//! Governance data model: proposals, deposits, votes, and tally results.

use crate::app::{AccountId, Decimal};
use crate::error::GovernanceError;
use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Maximum length in bytes of a proposal title.
pub const MAX_TITLE_LENGTH: usize = 140;
/// Maximum length in bytes of a proposal description.
pub const MAX_DESCRIPTION_LENGTH: usize = 10_000;

/// The category of a governance proposal. Selects the handler route.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, Encode, Decode)]
#[serde(rename_all = "snake_case")]
pub enum ProposalType {
    /// A generic proposal for signaling community intent, with no on-chain execution.
    Text,
    /// A proposal to change a registered on-chain parameter.
    ParameterChange,
    /// A proposal to perform a coordinated software upgrade.
    SoftwareUpgrade,
    /// A custom proposal type for application-specific governance.
    Custom(String),
}

impl ProposalType {
    /// The handler route for this proposal type.
    pub fn route(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::ParameterChange => "params",
            Self::SoftwareUpgrade => "upgrade",
            Self::Custom(route) => route,
        }
    }
}

/// The content of a proposal.
///
/// The engine stores and compares content but never interprets `payload`;
/// execution is delegated to the handler registered for `proposal_type`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, Encode, Decode)]
pub struct ProposalContent {
    /// The kind of proposal.
    pub proposal_type: ProposalType,
    /// A short human-readable title.
    pub title: String,
    /// A detailed description.
    pub description: String,
    /// Handler-specific payload, opaque to the engine.
    #[serde(default, with = "hex_bytes")]
    pub payload: Vec<u8>,
}

impl ProposalContent {
    /// Creates a text (signaling) proposal.
    pub fn text(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            proposal_type: ProposalType::Text,
            title: title.into(),
            description: description.into(),
            payload: Vec::new(),
        }
    }

    /// Stateless validation shared by every handler.
    pub fn validate_basic(&self) -> Result<(), GovernanceError> {
        if self.title.trim().is_empty() || self.description.trim().is_empty() {
            return Err(GovernanceError::EmptyProposal);
        }
        if self.title.len() > MAX_TITLE_LENGTH {
            return Err(GovernanceError::InvalidProposalContent(format!(
                "title is longer than max length of {}",
                MAX_TITLE_LENGTH
            )));
        }
        if self.description.len() > MAX_DESCRIPTION_LENGTH {
            return Err(GovernanceError::InvalidProposalContent(format!(
                "description is longer than max length of {}",
                MAX_DESCRIPTION_LENGTH
            )));
        }
        Ok(())
    }
}

/// The current status of a governance proposal in its lifecycle.
///
/// Transitions only move forward: `DepositPeriod -> VotingPeriod -> {Passed, Rejected, Failed}`,
/// or `DepositPeriod -> Failed` when the deposit deadline expires.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Encode, Decode)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    /// The proposal is collecting deposits.
    DepositPeriod,
    /// The proposal is open for votes.
    VotingPeriod,
    /// The proposal has passed.
    Passed,
    /// The proposal was rejected, either outright or by veto.
    Rejected,
    /// The proposal failed: deposit expiry, no quorum, or a failed execution.
    Failed,
}

impl ProposalStatus {
    /// Returns true for `Passed`, `Rejected`, and `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Passed | Self::Rejected | Self::Failed)
    }
}

impl core::fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            Self::DepositPeriod => "deposit_period",
            Self::VotingPeriod => "voting_period",
            Self::Passed => "passed",
            Self::Rejected => "rejected",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Per-option voting-power shares of the total possible voting power.
///
/// The four shares sum to at most one; they sum to exactly one only when every
/// unit of voting power cast a counted vote.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub struct TallyResult {
    /// Share that voted "Yes".
    pub yes: Decimal,
    /// Share that abstained.
    pub abstain: Decimal,
    /// Share that voted "No".
    pub no: Decimal,
    /// Share that voted "No with Veto".
    pub no_with_veto: Decimal,
}

/// A governance proposal.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct Proposal {
    /// The unique, monotonically assigned identifier.
    pub id: u64,
    /// The opaque proposal content.
    pub content: ProposalContent,
    /// The current lifecycle status.
    pub status: ProposalStatus,
    /// The account that submitted the proposal.
    pub proposer: AccountId,
    /// Block timestamp of submission, in seconds.
    pub submit_time: u64,
    /// Timestamp after which an under-funded proposal is forfeited.
    pub deposit_end_time: u64,
    /// Timestamp at which voting opened; zero until activation.
    pub voting_start_time: u64,
    /// Timestamp at which voting closes; zero until activation.
    pub voting_end_time: u64,
    /// Sum of all live deposits.
    pub total_deposit: u64,
    /// The final tally, populated at resolution.
    pub final_tally_result: Option<TallyResult>,
}

/// An accumulated deposit of one depositor on one proposal.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct Deposit {
    /// The proposal this deposit is bonded to.
    pub proposal_id: u64,
    /// The depositing account.
    pub depositor: AccountId,
    /// The accumulated amount.
    pub amount: u64,
}

/// A voting option for a governance proposal.
///
/// The discriminants are the wire tags accepted by the vote method.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Encode, Decode,
)]
#[serde(rename_all = "snake_case")]
pub enum VoteOption {
    /// A vote in favor of the proposal.
    Yes = 1,
    /// A vote to abstain, which counts towards quorum but not the threshold.
    Abstain = 2,
    /// A vote against the proposal.
    No = 3,
    /// A vote against that also counts towards a veto.
    NoWithVeto = 4,
}

impl VoteOption {
    /// All recognized options in tag order.
    pub const ALL: [VoteOption; 4] = [Self::Yes, Self::Abstain, Self::No, Self::NoWithVeto];

    /// Returns the wire tag of this option.
    pub fn tag(&self) -> u8 {
        *self as u8
    }
}

impl TryFrom<u8> for VoteOption {
    type Error = GovernanceError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            1 => Ok(Self::Yes),
            2 => Ok(Self::Abstain),
            3 => Ok(Self::No),
            4 => Ok(Self::NoWithVeto),
            other => Err(GovernanceError::InvalidVoteOption(other.to_string())),
        }
    }
}

impl FromStr for VoteOption {
    type Err = GovernanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" => Ok(Self::Yes),
            "abstain" => Ok(Self::Abstain),
            "no" => Ok(Self::No),
            "no_with_veto" | "nowithveto" | "veto" => Ok(Self::NoWithVeto),
            _ => Err(GovernanceError::InvalidVoteOption(s.to_string())),
        }
    }
}

impl core::fmt::Display for VoteOption {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            Self::Yes => "yes",
            Self::Abstain => "abstain",
            Self::No => "no",
            Self::NoWithVeto => "no_with_veto",
        };
        f.write_str(s)
    }
}

/// A vote of one voter on one proposal. Revotes overwrite the record.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct Vote {
    /// The proposal voted on.
    pub proposal_id: u64,
    /// The voting account.
    pub voter: AccountId,
    /// The chosen option.
    pub option: VoteOption,
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s).map_err(serde::de::Error::custom)
    }
}
