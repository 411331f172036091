// Path: crates/types/src/error/mod.rs
//! Core error types for the Agora governance engine.

use thiserror::Error;

/// A trait for assigning a stable, machine-readable string code to an error.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// Errors related to the key-value state or its codec.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// The requested key was not found in the state.
    #[error("Key not found in state")]
    KeyNotFound,
    /// An error occurred in the state backend.
    #[error("State backend error: {0}")]
    Backend(String),
    /// An error occurred while writing to the state.
    #[error("State write error: {0}")]
    WriteError(String),
    /// The provided value was invalid.
    #[error("Invalid value: {0}")]
    InvalidValue(String),
    /// An error occurred during state deserialization.
    #[error("Decode error: {0}")]
    Decode(String),
}

impl ErrorCode for StateError {
    fn code(&self) -> &'static str {
        match self {
            Self::KeyNotFound => "STATE_KEY_NOT_FOUND",
            Self::Backend(_) => "STATE_BACKEND_ERROR",
            Self::WriteError(_) => "STATE_WRITE_ERROR",
            Self::InvalidValue(_) => "STATE_INVALID_VALUE",
            Self::Decode(_) => "STATE_DECODE_ERROR",
        }
    }
}

/// Errors related to the governance service.
///
/// The display strings are part of the observable surface and are kept stable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GovernanceError {
    /// The referenced proposal ID has no record.
    #[error("unknown proposal: {0}")]
    UnknownProposal(u64),
    /// A deposit was attempted after the proposal left its deposit period.
    #[error("proposal already active: {0}")]
    ProposalNotInDepositPeriod(u64),
    /// A vote was attempted while the proposal is not in its voting period.
    #[error("inactive proposal: {0}")]
    InactiveProposal(u64),
    /// The depositor's balance does not cover the requested amount.
    #[error("insufficient funds: insufficient account funds; {available} < {requested}")]
    InsufficientFunds {
        /// The balance available to the depositor.
        available: u64,
        /// The amount the depositor tried to escrow.
        requested: u64,
    },
    /// The vote option is not one of the four recognized options.
    #[error("invalid vote option: {0}")]
    InvalidVoteOption(String),
    /// The proposal content is empty.
    #[error("proposal title and description must not be empty")]
    EmptyProposal,
    /// The proposal content failed validation for a reason other than emptiness.
    #[error("invalid proposal content: {0}")]
    InvalidProposalContent(String),
    /// The deposit amount is not acceptable.
    #[error("invalid deposit amount: {0}")]
    InvalidDeposit(u64),
    /// No handler is registered for the proposal's route.
    #[error("no handler exists for proposal route: {0}")]
    UnknownProposalRoute(String),
    /// A passed proposal's handler failed to execute.
    #[error("proposal execution failed: {0}")]
    ProposalExecution(String),
    /// Imported genesis state is inconsistent.
    #[error("invalid governance genesis: {0}")]
    GenesisMismatch(String),
}

impl ErrorCode for GovernanceError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnknownProposal(_) => "GOVERNANCE_UNKNOWN_PROPOSAL",
            Self::ProposalNotInDepositPeriod(_) => "GOVERNANCE_NOT_DEPOSIT_PERIOD",
            Self::InactiveProposal(_) => "GOVERNANCE_INACTIVE_PROPOSAL",
            Self::InsufficientFunds { .. } => "GOVERNANCE_INSUFFICIENT_FUNDS",
            Self::InvalidVoteOption(_) => "GOVERNANCE_INVALID_VOTE_OPTION",
            Self::EmptyProposal => "GOVERNANCE_EMPTY_PROPOSAL",
            Self::InvalidProposalContent(_) => "GOVERNANCE_INVALID_CONTENT",
            Self::InvalidDeposit(_) => "GOVERNANCE_INVALID_DEPOSIT",
            Self::UnknownProposalRoute(_) => "GOVERNANCE_UNKNOWN_ROUTE",
            Self::ProposalExecution(_) => "GOVERNANCE_EXECUTION_FAILED",
            Self::GenesisMismatch(_) => "GOVERNANCE_GENESIS_MISMATCH",
        }
    }
}

/// Errors reported by the balance custody collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BankError {
    /// The source account cannot cover the amount.
    #[error("insufficient account funds; {available} < {requested}")]
    InsufficientFunds {
        /// The balance available.
        available: u64,
        /// The amount requested.
        requested: u64,
    },
    /// Crediting the destination would overflow its balance.
    #[error("balance overflow")]
    Overflow,
    /// The underlying state failed.
    #[error("bank state error: {0}")]
    State(#[from] StateError),
}

impl ErrorCode for BankError {
    fn code(&self) -> &'static str {
        match self {
            Self::InsufficientFunds { .. } => "BANK_INSUFFICIENT_FUNDS",
            Self::Overflow => "BANK_OVERFLOW",
            Self::State(_) => "BANK_STATE_ERROR",
        }
    }
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration document could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(String),
    /// A parameter is outside its allowed range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParam {
        /// The parameter name.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

impl ErrorCode for ConfigError {
    fn code(&self) -> &'static str {
        match self {
            Self::Parse(_) => "CONFIG_PARSE_ERROR",
            Self::InvalidParam { .. } => "CONFIG_INVALID_PARAM",
        }
    }
}

/// The umbrella error returned by transactional governance operations.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// An error occurred during serialization.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// An error occurred during deserialization.
    #[error("Deserialization error: {0}")]
    Deserialization(String),
    /// An error originating from the governance module.
    #[error(transparent)]
    Governance(#[from] GovernanceError),
    /// An error originating from the balance custody collaborator.
    #[error("Bank error: {0}")]
    Bank(#[from] BankError),
    /// An error originating from the state manager.
    #[error("State error: {0}")]
    State(#[from] StateError),
}

impl ErrorCode for TransactionError {
    fn code(&self) -> &'static str {
        match self {
            Self::Serialization(_) => "TX_SERIALIZATION_ERROR",
            Self::Deserialization(_) => "TX_DESERIALIZATION_ERROR",
            Self::Governance(e) => e.code(),
            Self::Bank(e) => e.code(),
            Self::State(e) => e.code(),
        }
    }
}

impl TransactionError {
    /// Returns the governance error, if this is one.
    pub fn as_governance(&self) -> Option<&GovernanceError> {
        match self {
            Self::Governance(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_governance_messages_are_stable() {
        assert_eq!(
            GovernanceError::UnknownProposal(2).to_string(),
            "unknown proposal: 2"
        );
        assert_eq!(
            GovernanceError::ProposalNotInDepositPeriod(5).to_string(),
            "proposal already active: 5"
        );
        assert_eq!(
            GovernanceError::InsufficientFunds {
                available: 10000,
                requested: 15000
            }
            .to_string(),
            "insufficient funds: insufficient account funds; 10000 < 15000"
        );
    }

    #[test]
    fn test_transaction_error_is_transparent_for_governance() {
        let err: TransactionError = GovernanceError::InactiveProposal(3).into();
        assert_eq!(err.to_string(), "inactive proposal: 3");
        assert_eq!(err.code(), "GOVERNANCE_INACTIVE_PROPOSAL");
    }
}
