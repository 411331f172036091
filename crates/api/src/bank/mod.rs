// Path: crates/api/src/bank/mod.rs
//! Defines the `BankKeeper` trait for balance custody.

use crate::state::StateAccess;
use agora_types::app::AccountId;
use agora_types::error::BankError;

/// Moves and destroys fungible balances held in state.
///
/// The governance module escrows deposits by transferring them to its custody
/// account and later refunds or burns them. Implementations must fail without
/// side effects when the source balance is insufficient.
pub trait BankKeeper: Send + Sync {
    /// Returns the spendable balance of `account`. Unknown accounts hold zero.
    fn balance(&self, state: &dyn StateAccess, account: &AccountId) -> Result<u64, BankError>;

    /// Moves `amount` from `from` to `to`.
    fn transfer(
        &self,
        state: &mut dyn StateAccess,
        from: &AccountId,
        to: &AccountId,
        amount: u64,
    ) -> Result<(), BankError>;

    /// Destroys `amount` held by `from`.
    fn burn(&self, state: &mut dyn StateAccess, from: &AccountId, amount: u64)
        -> Result<(), BankError>;
}
