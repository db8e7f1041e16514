//! In-memory ledgers for simulation and tests
//!
//! Both ledgers check every precondition before touching a balance, so a
//! failed call leaves them unchanged.

use super::{Ledger, ShareLedger};
use crate::error::LedgerError;
use crate::types::{Address, Amount, Asset};
use std::collections::HashMap;
use tracing::trace;

/// Balances and allowances for any number of assets
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    balances: HashMap<(Asset, Address), Amount>,
    // (asset, owner, spender) -> remaining approval
    allowances: HashMap<(Asset, Address, Address), Amount>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint `amount` of `asset` out of thin air into `account`
    pub fn credit(
        &mut self,
        asset: Asset,
        account: Address,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let balance = self.balances.entry((asset, account)).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or(LedgerError::SupplyOverflow { account, amount })?;
        Ok(())
    }

    /// Grant `spender` the right to pull up to `amount` of `asset` from `owner`
    pub fn approve(&mut self, asset: Asset, owner: Address, spender: Address, amount: Amount) {
        self.allowances.insert((asset, owner, spender), amount);
    }

    pub fn allowance(&self, asset: Asset, owner: Address, spender: Address) -> Amount {
        self.allowances
            .get(&(asset, owner, spender))
            .copied()
            .unwrap_or(0)
    }

    /// Move base value along with a call, the way a host credits the callee
    /// before the call body runs
    pub fn attach_value(
        &mut self,
        caller: Address,
        callee: Address,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        self.transfer(Asset::Base, caller, callee, amount)
    }

    fn balance(&self, asset: Asset, account: Address) -> Amount {
        self.balances.get(&(asset, account)).copied().unwrap_or(0)
    }

    fn apply_transfer(
        &mut self,
        asset: Asset,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let available = self.balance(asset, from);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                asset,
                account: from,
                needed: amount,
                available,
            });
        }
        if from == to {
            return Ok(());
        }
        let credited = self
            .balance(asset, to)
            .checked_add(amount)
            .ok_or(LedgerError::SupplyOverflow { account: to, amount })?;

        self.balances.insert((asset, from), available - amount);
        self.balances.insert((asset, to), credited);
        trace!(%asset, %from, %to, amount, "ledger transfer");
        Ok(())
    }
}

impl Ledger for MemoryLedger {
    fn balance_of(&self, asset: Asset, account: Address) -> Result<Amount, LedgerError> {
        Ok(self.balance(asset, account))
    }

    fn transfer(
        &mut self,
        asset: Asset,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        self.apply_transfer(asset, from, to, amount)
    }

    fn transfer_requiring_approval(
        &mut self,
        asset: Asset,
        spender: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let approved = self.allowance(asset, from, spender);
        if approved < amount {
            return Err(LedgerError::InsufficientAllowance {
                asset,
                owner: from,
                spender,
                needed: amount,
                approved,
            });
        }
        self.apply_transfer(asset, from, to, amount)?;
        self.allowances
            .insert((asset, from, spender), approved - amount);
        Ok(())
    }
}

/// Share balances with a tracked total supply
#[derive(Debug, Clone, Default)]
pub struct MemoryShareLedger {
    balances: HashMap<Address, Amount>,
    total_supply: Amount,
}

impl MemoryShareLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of accounts holding a non-zero share balance
    pub fn holder_count(&self) -> usize {
        self.balances.values().filter(|b| **b > 0).count()
    }
}

impl ShareLedger for MemoryShareLedger {
    fn mint(&mut self, account: Address, amount: Amount) -> Result<(), LedgerError> {
        let supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::SupplyOverflow { account, amount })?;
        let balance = self.balance_of(account) + amount;
        self.total_supply = supply;
        self.balances.insert(account, balance);
        Ok(())
    }

    fn burn(&mut self, account: Address, amount: Amount) -> Result<(), LedgerError> {
        let available = self.balance_of(account);
        if available < amount {
            return Err(LedgerError::InsufficientShareBalance {
                account,
                needed: amount,
                available,
            });
        }
        self.balances.insert(account, available - amount);
        self.total_supply -= amount;
        Ok(())
    }

    fn total_supply(&self) -> Amount {
        self.total_supply
    }

    fn balance_of(&self, account: Address) -> Amount {
        self.balances.get(&account).copied().unwrap_or(0)
    }
}
