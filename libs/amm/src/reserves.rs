//! Reserve reads against the pool account
//!
//! The base balance reported here already includes any base value attached
//! to the call in progress; callers subtract their own inflow to recover the
//! reserve as it stood before the operation.

use crate::error::{AmmError, AmmResult};
use crate::ledger::{Ledger, ShareLedger};
use crate::pool::Pool;
use crate::types::{Amount, Asset};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Point-in-time view of pool holdings and share supply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub base_reserve: Amount,
    pub second_reserve: Amount,
    pub total_shares: Amount,
}

impl PoolSnapshot {
    /// Neither reserves nor shares are outstanding
    pub fn is_empty(&self) -> bool {
        self.total_shares == 0 && self.base_reserve == 0 && self.second_reserve == 0
    }
}

impl<L: Ledger, S: ShareLedger> Pool<L, S> {
    /// Second-asset balance held by the pool account
    pub fn get_reserve(&self) -> AmmResult<Amount> {
        Ok(self
            .ledger
            .balance_of(self.config.second_asset(), self.config.pool_account())?)
    }

    /// Base balance held by the pool account, including value attached to
    /// the current call
    pub fn base_balance(&self) -> AmmResult<Amount> {
        Ok(self
            .ledger
            .balance_of(Asset::Base, self.config.pool_account())?)
    }

    pub fn snapshot(&self) -> AmmResult<PoolSnapshot> {
        Ok(PoolSnapshot {
            base_reserve: self.base_balance()?,
            second_reserve: self.get_reserve()?,
            total_shares: self.shares.total_supply(),
        })
    }

    /// Second-per-base mid price, for display only
    pub fn spot_price(&self) -> AmmResult<Decimal> {
        let base = self.base_balance()?;
        let second = self.get_reserve()?;
        if base == 0 || second == 0 {
            return Err(AmmError::InvalidReserves {
                input_reserve: base,
                output_reserve: second,
            });
        }
        let overflow = AmmError::ArithmeticOverflow {
            context: "spot price",
        };
        let base = Decimal::from_u128(base).ok_or_else(|| overflow.clone())?;
        let second = Decimal::from_u128(second).ok_or_else(|| overflow.clone())?;
        second.checked_div(base).ok_or(overflow)
    }
}

/// Reserve as it stood before this call's own `inflow` was credited
pub(crate) fn reserve_before(
    balance: Amount,
    inflow: Amount,
    context: &'static str,
) -> AmmResult<Amount> {
    balance
        .checked_sub(inflow)
        .ok_or(AmmError::ArithmeticUnderflow {
            context,
            balance,
            subtrahend: inflow,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{MemoryLedger, MemoryShareLedger};
    use crate::math::FeeSchedule;
    use crate::pool::PoolConfig;
    use crate::types::Address;
    use rust_decimal_macros::dec;

    const POOL: Address = Address::from_low_byte(0xaa);
    const TOKEN: Address = Address::from_low_byte(0xbb);

    fn pool_with(base: Amount, second: Amount) -> Pool<MemoryLedger, MemoryShareLedger> {
        let config = PoolConfig::new(POOL, TOKEN, FeeSchedule::default()).unwrap();
        let mut ledger = MemoryLedger::new();
        ledger.credit(Asset::Base, POOL, base).unwrap();
        ledger.credit(Asset::Token(TOKEN), POOL, second).unwrap();
        Pool::new(config, ledger, MemoryShareLedger::new())
    }

    #[test]
    fn test_reads_both_reserves() {
        let pool = pool_with(2000, 1000);
        assert_eq!(pool.get_reserve().unwrap(), 1000);
        assert_eq!(pool.base_balance().unwrap(), 2000);

        let snapshot = pool.snapshot().unwrap();
        assert_eq!(snapshot.total_shares, 0);
        assert!(!snapshot.is_empty());
    }

    #[test]
    fn test_spot_price() {
        let pool = pool_with(2000, 1000);
        assert_eq!(pool.spot_price().unwrap(), dec!(0.5));

        let empty = pool_with(0, 0);
        assert!(matches!(
            empty.spot_price(),
            Err(AmmError::InvalidReserves { .. })
        ));
        assert!(empty.snapshot().unwrap().is_empty());
    }

    #[test]
    fn test_reserve_before_underflow() {
        assert_eq!(reserve_before(2100, 100, "t").unwrap(), 2000);
        assert!(matches!(
            reserve_before(50, 100, "t"),
            Err(AmmError::ArithmeticUnderflow { balance: 50, subtrahend: 100, .. })
        ));
    }
}
