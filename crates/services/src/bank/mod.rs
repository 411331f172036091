// Path: crates/services/src/bank/mod.rs
//! A balance keeper that stores balances in the shared key-value state.

use agora_api::bank::BankKeeper;
use agora_api::state::StateAccess;
use agora_types::app::AccountId;
use agora_types::codec;
use agora_types::error::{BankError, StateError};
use agora_types::keys::balance_key;

/// Balances stored under `bank::balance::{account}` as canonical `u64`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StateBank;

impl StateBank {
    /// Creates the keeper.
    pub fn new() -> Self {
        Self
    }

    fn read(state: &dyn StateAccess, account: &AccountId) -> Result<u64, BankError> {
        match state.get(&balance_key(account))? {
            Some(bytes) => Ok(codec::from_bytes_canonical::<u64>(&bytes).map_err(StateError::Decode)?),
            None => Ok(0),
        }
    }

    fn write(state: &mut dyn StateAccess, account: &AccountId, amount: u64) -> Result<(), BankError> {
        let key = balance_key(account);
        if amount == 0 {
            state.delete(&key)?;
        } else {
            let bytes = codec::to_bytes_canonical(&amount).map_err(StateError::InvalidValue)?;
            state.insert(&key, &bytes)?;
        }
        Ok(())
    }

    /// Credits newly created funds to `account`.
    pub fn mint(
        &self,
        state: &mut dyn StateAccess,
        account: &AccountId,
        amount: u64,
    ) -> Result<(), BankError> {
        let balance = Self::read(state, account)?
            .checked_add(amount)
            .ok_or(BankError::Overflow)?;
        Self::write(state, account, balance)
    }

    fn debited(state: &dyn StateAccess, account: &AccountId, amount: u64) -> Result<u64, BankError> {
        let available = Self::read(state, account)?;
        available
            .checked_sub(amount)
            .ok_or(BankError::InsufficientFunds {
                available,
                requested: amount,
            })
    }
}

impl BankKeeper for StateBank {
    fn balance(&self, state: &dyn StateAccess, account: &AccountId) -> Result<u64, BankError> {
        Self::read(state, account)
    }

    fn transfer(
        &self,
        state: &mut dyn StateAccess,
        from: &AccountId,
        to: &AccountId,
        amount: u64,
    ) -> Result<(), BankError> {
        let from_after = Self::debited(state, from, amount)?;
        if from == to {
            return Ok(());
        }
        let to_after = Self::read(state, to)?
            .checked_add(amount)
            .ok_or(BankError::Overflow)?;
        Self::write(state, from, from_after)?;
        Self::write(state, to, to_after)
    }

    fn burn(
        &self,
        state: &mut dyn StateAccess,
        from: &AccountId,
        amount: u64,
    ) -> Result<(), BankError> {
        let after = Self::debited(state, from, amount)?;
        Self::write(state, from, after)
    }
}
