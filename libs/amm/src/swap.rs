//! One-directional swaps against the pool
//!
//! Each swap prices itself from a fresh reserve read, checks the caller's
//! slippage bound, and only then moves assets.

use crate::error::{AmmError, AmmResult};
use crate::ledger::{Ledger, ShareLedger};
use crate::pool::Pool;
use crate::reserves::reserve_before;
use crate::types::{Address, Amount, Asset};
use tracing::{info, warn};

fn check_slippage(amount_out: Amount, min_out: Amount) -> AmmResult<()> {
    if amount_out < min_out {
        warn!(amount_out, min_out, "swap rejected: slippage bound");
        return Err(AmmError::SlippageExceeded {
            amount_out,
            min_out,
        });
    }
    Ok(())
}

impl<L: Ledger, S: ShareLedger> Pool<L, S> {
    /// Sell `base_amount_in` (already attached to the call) for the second asset
    pub fn swap_base_for_second(
        &mut self,
        caller: Address,
        base_amount_in: Amount,
        min_second_out: Amount,
    ) -> AmmResult<Amount> {
        let second_reserve = self.get_reserve()?;
        let base_before = reserve_before(
            self.base_balance()?,
            base_amount_in,
            "base reserve before swap",
        )?;

        let second_out = self.quote_output(base_amount_in, base_before, second_reserve)?;
        check_slippage(second_out, min_second_out)?;

        self.ledger.transfer(
            self.config.second_asset(),
            self.config.pool_account(),
            caller,
            second_out,
        )?;

        info!(%caller, base_amount_in, second_out, "swapped base for second");
        Ok(second_out)
    }

    /// Sell `second_amount_in` of the second asset for base
    ///
    /// The second asset is pulled before any base leaves the pool, so a
    /// failed pull aborts the swap with nothing paid out.
    pub fn swap_second_for_base(
        &mut self,
        caller: Address,
        second_amount_in: Amount,
        min_base_out: Amount,
    ) -> AmmResult<Amount> {
        let second_reserve = self.get_reserve()?;
        let base_reserve = self.base_balance()?;

        let base_out = self.quote_output(second_amount_in, second_reserve, base_reserve)?;
        check_slippage(base_out, min_base_out)?;

        let pool_account = self.config.pool_account();
        self.ledger.transfer_requiring_approval(
            self.config.second_asset(),
            pool_account,
            caller,
            pool_account,
            second_amount_in,
        )?;
        self.ledger
            .transfer(Asset::Base, pool_account, caller, base_out)?;

        info!(%caller, second_amount_in, base_out, "swapped second for base");
        Ok(base_out)
    }
}
