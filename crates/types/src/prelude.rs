// Path: crates/types/src/prelude.rs

//! A curated set of commonly used traits and types.

pub use crate::app::{
    AccountId, Decimal, Deposit, Proposal, ProposalContent, ProposalStatus, ProposalType,
    TallyResult, Threshold, Vote, VoteOption,
};
pub use crate::error::{ErrorCode, GovernanceError, StateError, TransactionError};
