// Path: crates/api/src/lifecycle/mod.rs
//! Defines traits for services that hook into the block processing lifecycle.

use crate::state::StateAccess;
use crate::transaction::context::TxContext;
use agora_types::error::StateError;

/// A trait for services that need to perform actions at the end of a block.
pub trait OnEndBlock: Send + Sync {
    /// Called after all transactions in a block have been processed.
    fn on_end_block(&self, state: &mut dyn StateAccess, ctx: &TxContext)
        -> Result<(), StateError>;
}
