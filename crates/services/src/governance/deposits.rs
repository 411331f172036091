// Path: crates/services/src/governance/deposits.rs
//! Escrowed proposal deposits: accumulation, refund, and forfeiture.

use super::store::{decode, encode, get_proposal, require_proposal, save_proposal, scan_values};
use agora_api::bank::BankKeeper;
use agora_api::state::StateAccess;
use agora_types::app::{AccountId, Deposit, ProposalStatus};
use agora_types::error::{BankError, GovernanceError, StateError, TransactionError};
use agora_types::keys::{deposit_key, deposits_prefix, GOVERNANCE_DEPOSIT_KEY_PREFIX};
use agora_types::service_configs::{DepositDisposition, ForfeitureMode};

/// Escrows `amount` from `depositor` into `custody` and records it against the proposal.
///
/// Returns true iff this deposit moved the proposal's total from below
/// `min_deposit` to at least `min_deposit`. Every check runs before the first
/// write; the caller's overlay covers failures inside the bank.
pub(crate) fn add_deposit(
    state: &mut dyn StateAccess,
    bank: &dyn BankKeeper,
    custody: &AccountId,
    min_deposit: u64,
    proposal_id: u64,
    depositor: &AccountId,
    amount: u64,
) -> Result<bool, TransactionError> {
    let mut proposal = require_proposal(state, proposal_id)?;
    if proposal.status != ProposalStatus::DepositPeriod {
        return Err(GovernanceError::ProposalNotInDepositPeriod(proposal_id).into());
    }
    if amount == 0 {
        return Err(GovernanceError::InvalidDeposit(amount).into());
    }
    let available = bank.balance(state, depositor)?;
    if available < amount {
        return Err(GovernanceError::InsufficientFunds {
            available,
            requested: amount,
        }
        .into());
    }

    let key = deposit_key(proposal_id, depositor);
    let mut deposit = match state.get(&key)? {
        Some(bytes) => decode::<Deposit>(&bytes)?,
        None => Deposit {
            proposal_id,
            depositor: *depositor,
            amount: 0,
        },
    };
    deposit.amount = deposit
        .amount
        .checked_add(amount)
        .ok_or(BankError::Overflow)?;
    let was_below = proposal.total_deposit < min_deposit;
    proposal.total_deposit = proposal
        .total_deposit
        .checked_add(amount)
        .ok_or(BankError::Overflow)?;

    bank.transfer(state, depositor, custody, amount)
        .map_err(|e| match e {
            BankError::InsufficientFunds {
                available,
                requested,
            } => TransactionError::from(GovernanceError::InsufficientFunds {
                available,
                requested,
            }),
            other => other.into(),
        })?;
    state.insert(&key, &encode(&deposit)?)?;
    save_proposal(state, &proposal)?;

    log::debug!(
        "[Governance] deposit of {} on proposal {} by {} (total {})",
        amount,
        proposal_id,
        depositor,
        proposal.total_deposit
    );
    Ok(was_below && proposal.total_deposit >= min_deposit)
}

pub(crate) fn get_deposit(
    state: &dyn StateAccess,
    proposal_id: u64,
    depositor: &AccountId,
) -> Result<Option<Deposit>, StateError> {
    state
        .get(&deposit_key(proposal_id, depositor))?
        .map(|bytes| decode(&bytes))
        .transpose()
}

/// Deposits on one proposal, ordered by depositor.
pub(crate) fn get_deposits(
    state: &dyn StateAccess,
    proposal_id: u64,
) -> Result<Vec<Deposit>, StateError> {
    scan_values(state, &deposits_prefix(proposal_id))
}

/// Every live deposit, ordered by proposal ID, then depositor.
pub(crate) fn get_all_deposits(state: &dyn StateAccess) -> Result<Vec<Deposit>, StateError> {
    scan_values(state, GOVERNANCE_DEPOSIT_KEY_PREFIX)
}

/// Deletes the deposit records of a proposal and zeroes its total. Returns the removed deposits.
fn take_deposits(
    state: &mut dyn StateAccess,
    proposal_id: u64,
) -> Result<Vec<Deposit>, StateError> {
    let deposits = get_deposits(state, proposal_id)?;
    for deposit in &deposits {
        state.delete(&deposit_key(proposal_id, &deposit.depositor))?;
    }
    if let Some(mut proposal) = get_proposal(state, proposal_id)? {
        if proposal.total_deposit != 0 {
            proposal.total_deposit = 0;
            save_proposal(state, &proposal)?;
        }
    }
    Ok(deposits)
}

/// Returns every deposit on the proposal from custody and deletes the records.
/// A proposal without deposits is a no-op.
pub(crate) fn refund_deposits(
    state: &mut dyn StateAccess,
    bank: &dyn BankKeeper,
    custody: &AccountId,
    proposal_id: u64,
) -> Result<u64, TransactionError> {
    let deposits = take_deposits(state, proposal_id)?;
    let mut refunded = 0u64;
    for deposit in deposits {
        bank.transfer(state, custody, &deposit.depositor, deposit.amount)?;
        refunded = refunded
            .checked_add(deposit.amount)
            .ok_or(BankError::Overflow)?;
    }
    if refunded > 0 {
        log::debug!(
            "[Governance] refunded {} in deposits on proposal {}",
            refunded,
            proposal_id
        );
    }
    Ok(refunded)
}

/// Deletes every deposit on the proposal without refunding it.
///
/// With `ForfeitureMode::Retain` the escrowed funds stay in custody; with
/// `ForfeitureMode::Burn` they are destroyed.
pub(crate) fn delete_deposits(
    state: &mut dyn StateAccess,
    bank: &dyn BankKeeper,
    custody: &AccountId,
    proposal_id: u64,
    mode: ForfeitureMode,
) -> Result<u64, TransactionError> {
    let deposits = take_deposits(state, proposal_id)?;
    let forfeited = deposits
        .iter()
        .try_fold(0u64, |acc, d| acc.checked_add(d.amount))
        .ok_or(BankError::Overflow)?;
    if forfeited > 0 {
        if mode == ForfeitureMode::Burn {
            bank.burn(state, custody, forfeited)?;
        }
        log::info!(
            "[Governance] forfeited {} in deposits on proposal {} ({:?})",
            forfeited,
            proposal_id,
            mode
        );
    }
    Ok(forfeited)
}

/// Applies a configured disposition to the proposal's deposits.
pub(crate) fn dispose(
    state: &mut dyn StateAccess,
    bank: &dyn BankKeeper,
    custody: &AccountId,
    proposal_id: u64,
    disposition: DepositDisposition,
    mode: ForfeitureMode,
) -> Result<(), TransactionError> {
    match disposition {
        DepositDisposition::Refund => refund_deposits(state, bank, custody, proposal_id)?,
        DepositDisposition::Forfeit => delete_deposits(state, bank, custody, proposal_id, mode)?,
    };
    Ok(())
}
