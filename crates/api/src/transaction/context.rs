// Path: crates/api/src/transaction/context.rs
//! Defines the stable context for transaction execution.

use agora_types::app::AccountId;

/// Provides stable, read-only context to governance operations during execution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxContext {
    /// The current block height being processed.
    pub block_height: u64,
    /// The deterministic timestamp of the current block, in seconds, taken from its header.
    /// All deposit and voting deadlines are compared against this value.
    pub block_timestamp: u64,
    /// The `AccountId` of the entity that signed the current transaction.
    /// For end-block hooks this is the module's own account.
    pub signer_account_id: AccountId,
}

impl TxContext {
    /// Creates a context for a transaction signed by `signer`.
    pub fn new(block_height: u64, block_timestamp: u64, signer: AccountId) -> Self {
        Self {
            block_height,
            block_timestamp,
            signer_account_id: signer,
        }
    }
}
