//! Deposits and withdrawals of liquidity
//!
//! Share issuance keeps every holder's claim proportional:
//!
//! - first deposit: shares = base sent (which must be non-zero), second
//!   asset taken as offered
//! - later deposits: second required = base * second_reserve / base_before,
//!   shares = total_shares * base / base_before
//! - withdrawal: each asset paid = reserve * shares / total_shares
//!
//! All divisions floor, so rounding dust always stays in the pool. Plans are
//! computed from a fresh read before any ledger mutation; a rejected plan
//! leaves the ledgers untouched.

use crate::error::{AmmError, AmmResult};
use crate::ledger::{Ledger, ShareLedger};
use crate::math::mul_div_floor;
use crate::pool::Pool;
use crate::reserves::reserve_before;
use crate::types::{Address, Amount, Asset};
use tracing::{debug, info, warn};

/// Effects of an accepted deposit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositPlan {
    /// Second asset to pull from the depositor
    pub second_to_pull: Amount,
    pub shares_to_mint: Amount,
}

/// Effects of an accepted withdrawal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithdrawalPlan {
    pub base_out: Amount,
    pub second_out: Amount,
}

/// Price a deposit against the current pool state
///
/// `base_balance` is the pool's base balance with `base_sent` already
/// credited; `second_reserve` is read before any second-asset pull.
pub fn plan_deposit(
    total_shares: Amount,
    base_balance: Amount,
    second_reserve: Amount,
    base_sent: Amount,
    second_offered: Amount,
) -> AmmResult<DepositPlan> {
    if total_shares == 0 {
        // Zero shares over a funded pool would hand the next depositor its reserves
        if base_sent == 0 {
            return Err(AmmError::InvalidAmount);
        }
        // First depositor sets the price and gets shares 1:1 with base
        return Ok(DepositPlan {
            second_to_pull: second_offered,
            shares_to_mint: base_sent,
        });
    }

    let base_before = reserve_before(base_balance, base_sent, "base reserve before deposit")?;
    let required = mul_div_floor(
        base_sent,
        second_reserve,
        base_before,
        "required second amount",
    )?;
    if second_offered < required {
        return Err(AmmError::InsufficientOfferedAmount {
            offered: second_offered,
            required,
        });
    }
    let shares_to_mint = mul_div_floor(total_shares, base_sent, base_before, "shares to mint")?;

    // Only the ratio-required amount is pulled; any excess offer stays with the caller
    Ok(DepositPlan {
        second_to_pull: required,
        shares_to_mint,
    })
}

/// Price a withdrawal of `shares_to_burn` from a holder of `holder_shares`
pub fn plan_withdrawal(
    total_shares: Amount,
    base_reserve: Amount,
    second_reserve: Amount,
    holder_shares: Amount,
    shares_to_burn: Amount,
) -> AmmResult<WithdrawalPlan> {
    if shares_to_burn == 0 {
        return Err(AmmError::InvalidAmount);
    }
    if holder_shares < shares_to_burn {
        return Err(AmmError::InsufficientShares {
            requested: shares_to_burn,
            available: holder_shares,
        });
    }
    if total_shares == 0 {
        return Err(AmmError::DivisionByZero {
            context: "withdrawal with no outstanding shares",
        });
    }

    Ok(WithdrawalPlan {
        base_out: mul_div_floor(base_reserve, shares_to_burn, total_shares, "base withdrawal")?,
        second_out: mul_div_floor(
            second_reserve,
            shares_to_burn,
            total_shares,
            "second withdrawal",
        )?,
    })
}

impl<L: Ledger, S: ShareLedger> Pool<L, S> {
    /// Deposit `base_amount_sent` (already attached to the call) plus the
    /// matching second amount, minting shares to `caller`
    pub fn add_liquidity(
        &mut self,
        caller: Address,
        base_amount_sent: Amount,
        second_amount_offered: Amount,
    ) -> AmmResult<Amount> {
        let total_shares = self.shares.total_supply();
        let base_balance = self.base_balance()?;
        let second_reserve = self.get_reserve()?;

        let plan = plan_deposit(
            total_shares,
            base_balance,
            second_reserve,
            base_amount_sent,
            second_amount_offered,
        )
        .map_err(|e| {
            warn!(%caller, base_amount_sent, second_amount_offered, error = %e, "deposit rejected");
            e
        })?;
        debug!(
            total_shares,
            base_balance, second_reserve, ?plan, "deposit planned"
        );

        let pool_account = self.config.pool_account();
        self.ledger.transfer_requiring_approval(
            self.config.second_asset(),
            pool_account,
            caller,
            pool_account,
            plan.second_to_pull,
        )?;
        self.shares.mint(caller, plan.shares_to_mint)?;

        info!(
            %caller,
            base_amount_sent,
            second_pulled = plan.second_to_pull,
            shares_issued = plan.shares_to_mint,
            "liquidity added"
        );
        Ok(plan.shares_to_mint)
    }

    /// Burn `shares_to_burn` of `caller`'s shares and pay out both assets
    pub fn remove_liquidity(
        &mut self,
        caller: Address,
        shares_to_burn: Amount,
    ) -> AmmResult<(Amount, Amount)> {
        let total_shares = self.shares.total_supply();
        let base_reserve = self.base_balance()?;
        let second_reserve = self.get_reserve()?;

        let plan = plan_withdrawal(
            total_shares,
            base_reserve,
            second_reserve,
            self.shares.balance_of(caller),
            shares_to_burn,
        )
        .map_err(|e| {
            warn!(%caller, shares_to_burn, error = %e, "withdrawal rejected");
            e
        })?;

        let pool_account = self.config.pool_account();
        self.shares.burn(caller, shares_to_burn)?;
        self.ledger
            .transfer(Asset::Base, pool_account, caller, plan.base_out)?;
        self.ledger.transfer(
            self.config.second_asset(),
            pool_account,
            caller,
            plan.second_out,
        )?;

        info!(
            %caller,
            shares_burned = shares_to_burn,
            base_out = plan.base_out,
            second_out = plan.second_out,
            "liquidity removed"
        );
        Ok((plan.base_out, plan.second_out))
    }

    /// What `remove_liquidity` would pay `account` for its whole balance
    pub fn withdrawable_for(&self, account: Address) -> AmmResult<(Amount, Amount)> {
        let held = self.shares.balance_of(account);
        if held == 0 {
            return Ok((0, 0));
        }
        let plan = plan_withdrawal(
            self.shares.total_supply(),
            self.base_balance()?,
            self.get_reserve()?,
            held,
            held,
        )?;
        Ok((plan.base_out, plan.second_out))
    }
}
