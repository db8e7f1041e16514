//! Ledger capability traits the pool is built on
//!
//! The pool never stores balances itself. Asset balances live behind
//! [`Ledger`] and ownership shares behind [`ShareLedger`]; durability,
//! atomicity and visibility are the host's responsibility.

pub mod memory;

pub use memory::{MemoryLedger, MemoryShareLedger};

use crate::error::LedgerError;
use crate::types::{Address, Amount, Asset};

/// Asset ledger for the base asset and the second token
pub trait Ledger {
    /// Current balance of `asset` held by `account`
    fn balance_of(&self, asset: Asset, account: Address) -> Result<Amount, LedgerError>;

    /// Move `amount` from `from` to `to`; `from` is the acting account
    fn transfer(
        &mut self,
        asset: Asset,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), LedgerError>;

    /// Pull `amount` from `from` to `to` on behalf of `spender`, consuming an
    /// allowance `from` previously granted to `spender`
    fn transfer_requiring_approval(
        &mut self,
        asset: Asset,
        spender: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), LedgerError>;
}

/// Minimal fungible share capability: mint, burn, balances and supply
pub trait ShareLedger {
    fn mint(&mut self, account: Address, amount: Amount) -> Result<(), LedgerError>;

    fn burn(&mut self, account: Address, amount: Amount) -> Result<(), LedgerError>;

    fn total_supply(&self) -> Amount;

    fn balance_of(&self, account: Address) -> Amount;
}

impl<T: Ledger + ?Sized> Ledger for &mut T {
    fn balance_of(&self, asset: Asset, account: Address) -> Result<Amount, LedgerError> {
        (**self).balance_of(asset, account)
    }

    fn transfer(
        &mut self,
        asset: Asset,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        (**self).transfer(asset, from, to, amount)
    }

    fn transfer_requiring_approval(
        &mut self,
        asset: Asset,
        spender: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        (**self).transfer_requiring_approval(asset, spender, from, to, amount)
    }
}

impl<T: ShareLedger + ?Sized> ShareLedger for &mut T {
    fn mint(&mut self, account: Address, amount: Amount) -> Result<(), LedgerError> {
        (**self).mint(account, amount)
    }

    fn burn(&mut self, account: Address, amount: Amount) -> Result<(), LedgerError> {
        (**self).burn(account, amount)
    }

    fn total_supply(&self) -> Amount {
        (**self).total_supply()
    }

    fn balance_of(&self, account: Address) -> Amount {
        (**self).balance_of(account)
    }
}
