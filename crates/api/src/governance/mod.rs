// Path: crates/api/src/governance/mod.rs
//! Defines the `ProposalHandler` trait for content validation and execution.

use crate::state::StateAccess;
use crate::transaction::context::TxContext;
use agora_types::app::ProposalContent;
use agora_types::error::{GovernanceError, TransactionError};

/// Validates proposal content at submission and executes it once it passes.
///
/// `execute` runs inside its own overlay: if it returns an error every write
/// it made is discarded and the proposal is marked failed.
pub trait ProposalHandler: Send + Sync {
    /// Rejects content that could never be executed.
    fn validate(&self, content: &ProposalContent) -> Result<(), GovernanceError>;

    /// Applies a passed proposal's effects.
    fn execute(
        &self,
        state: &mut dyn StateAccess,
        content: &ProposalContent,
        ctx: &TxContext,
    ) -> Result<(), TransactionError>;
}
