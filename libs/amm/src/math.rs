//! Constant-product pricing with exact integer arithmetic
//!
//! Quotes follow `x * y = k` with the fee taken from the input side:
//!
//! ```text
//! in_with_fee = amount_in * (10_000 - fee_bps)
//! amount_out  = in_with_fee * reserve_out / (reserve_in * 10_000 + in_with_fee)
//! ```
//!
//! All products are formed in [`U256`] and every division floors, so the pool
//! never pays out more than the curve allows. Anything that would not fit is
//! reported as [`AmmError::ArithmeticOverflow`] instead of wrapping.

use crate::error::{AmmError, AmmResult};
use crate::types::{Amount, U256};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Basis points scale (10,000 bps = 100%)
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Reference fee: 1% of every swap input stays in the pool
pub const REFERENCE_FEE_BPS: u32 = 100;

/// Swap fee fixed at pool creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    fee_bps: u32,
}

impl FeeSchedule {
    /// Create a fee schedule; a fee of 100% or more can never produce output
    pub fn new(fee_bps: u32) -> AmmResult<Self> {
        if fee_bps >= BPS_DENOMINATOR {
            return Err(AmmError::config(format!(
                "fee of {} bps must be below {} bps",
                fee_bps, BPS_DENOMINATOR
            )));
        }
        Ok(Self { fee_bps })
    }

    /// Fee-free schedule, used for theoretical comparisons
    pub const fn zero() -> Self {
        Self { fee_bps: 0 }
    }

    pub fn fee_bps(&self) -> u32 {
        self.fee_bps
    }

    /// Portion of the input that trades against the curve, in bps
    pub fn input_multiplier(&self) -> u32 {
        BPS_DENOMINATOR - self.fee_bps
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            fee_bps: REFERENCE_FEE_BPS,
        }
    }
}

/// `floor(a * b / denominator)` with a 256-bit intermediate product
pub fn mul_div_floor(
    a: Amount,
    b: Amount,
    denominator: Amount,
    context: &'static str,
) -> AmmResult<Amount> {
    if denominator == 0 {
        return Err(AmmError::DivisionByZero { context });
    }
    let product = U256::from(a) * U256::from(b);
    narrow(product / U256::from(denominator), context)
}

fn narrow(value: U256, context: &'static str) -> AmmResult<Amount> {
    if value > U256::from(Amount::MAX) {
        return Err(AmmError::ArithmeticOverflow { context });
    }
    Ok(value.as_u128())
}

fn checked_mul(a: U256, b: U256, context: &'static str) -> AmmResult<U256> {
    a.checked_mul(b)
        .ok_or(AmmError::ArithmeticOverflow { context })
}

/// Output amount for `amount_in` under an explicit fee schedule
pub fn quote_output_with_fee(
    fee: FeeSchedule,
    amount_in: Amount,
    reserve_in: Amount,
    reserve_out: Amount,
) -> AmmResult<Amount> {
    if reserve_in == 0 || reserve_out == 0 {
        return Err(AmmError::InvalidReserves {
            input_reserve: reserve_in,
            output_reserve: reserve_out,
        });
    }

    let multiplier = U256::from(fee.input_multiplier());
    let in_with_fee = checked_mul(U256::from(amount_in), multiplier, "quote input with fee")?;
    let numerator = checked_mul(in_with_fee, U256::from(reserve_out), "quote numerator")?;
    let scaled_reserve = checked_mul(
        U256::from(reserve_in),
        U256::from(BPS_DENOMINATOR),
        "quote denominator",
    )?;
    let denominator = scaled_reserve
        .checked_add(in_with_fee)
        .ok_or(AmmError::ArithmeticOverflow {
            context: "quote denominator",
        })?;

    let amount_out = narrow(numerator / denominator, "quote output")?;

    debug!(
        amount_in,
        reserve_in,
        reserve_out,
        fee_bps = fee.fee_bps(),
        amount_out,
        "quoted swap output"
    );

    Ok(amount_out)
}

/// Smallest input that yields at least `amount_out`, rounded up
pub fn quote_input_with_fee(
    fee: FeeSchedule,
    amount_out: Amount,
    reserve_in: Amount,
    reserve_out: Amount,
) -> AmmResult<Amount> {
    if reserve_in == 0 || reserve_out == 0 {
        return Err(AmmError::InvalidReserves {
            input_reserve: reserve_in,
            output_reserve: reserve_out,
        });
    }
    if amount_out == 0 {
        return Err(AmmError::InvalidAmount);
    }
    if amount_out >= reserve_out {
        return Err(AmmError::InsufficientLiquidity {
            requested: amount_out,
            reserve: reserve_out,
        });
    }

    let numerator = checked_mul(
        checked_mul(
            U256::from(reserve_in),
            U256::from(amount_out),
            "input quote numerator",
        )?,
        U256::from(BPS_DENOMINATOR),
        "input quote numerator",
    )?;
    let denominator = checked_mul(
        U256::from(reserve_out - amount_out),
        U256::from(fee.input_multiplier()),
        "input quote denominator",
    )?;

    // +1 so the caller always sends enough to clear `amount_out`
    let amount_in = narrow(numerator / denominator, "input quote")?;
    amount_in
        .checked_add(1)
        .ok_or(AmmError::ArithmeticOverflow {
            context: "input quote",
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_swap_quote() {
        // Pool (2000 base, 1000 second), 100 base in at 1%:
        // 9900 * 1000 / (2000 * 100 + 9900) = 47.16 -> 47
        let out = quote_output_with_fee(FeeSchedule::default(), 100, 2000, 1000).unwrap();
        assert_eq!(out, 47);
    }

    #[test]
    fn test_zero_reserve_rejected() {
        let err = quote_output_with_fee(FeeSchedule::default(), 100, 0, 1000).unwrap_err();
        assert_eq!(
            err,
            AmmError::InvalidReserves {
                input_reserve: 0,
                output_reserve: 1000
            }
        );
        assert!(quote_output_with_fee(FeeSchedule::default(), 100, 1000, 0).is_err());
    }

    #[test]
    fn test_zero_input_quotes_zero() {
        let out = quote_output_with_fee(FeeSchedule::default(), 0, 1000, 1000).unwrap();
        assert_eq!(out, 0);
    }

    #[test]
    fn test_fee_reduces_output() {
        let with_fee = quote_output_with_fee(FeeSchedule::default(), 10_000, 1_000_000, 1_000_000)
            .unwrap();
        let no_fee =
            quote_output_with_fee(FeeSchedule::zero(), 10_000, 1_000_000, 1_000_000).unwrap();
        assert!(with_fee < no_fee);
    }

    #[test]
    fn test_large_reserves_do_not_overflow() {
        let reserve = u128::MAX / 4;
        let out = quote_output_with_fee(FeeSchedule::default(), 1u128 << 100, reserve, reserve)
            .unwrap();
        assert!(out > 0);
        assert!(out < reserve);
    }

    #[test]
    fn test_overflow_is_reported() {
        let err = quote_output_with_fee(FeeSchedule::default(), u128::MAX, u128::MAX, u128::MAX)
            .unwrap_err();
        assert!(matches!(err, AmmError::ArithmeticOverflow { .. }));
    }

    #[test]
    fn test_input_quote_clears_requested_output() {
        let fee = FeeSchedule::default();
        let amount_in = quote_input_with_fee(fee, 47, 2000, 1000).unwrap();
        assert!(quote_output_with_fee(fee, amount_in, 2000, 1000).unwrap() >= 47);
        assert!(quote_output_with_fee(fee, amount_in - 1, 2000, 1000).unwrap() < 48);
    }

    #[test]
    fn test_input_quote_rejects_draining_output() {
        let err = quote_input_with_fee(FeeSchedule::default(), 1000, 2000, 1000).unwrap_err();
        assert!(matches!(err, AmmError::InsufficientLiquidity { .. }));
    }

    #[test]
    fn test_fee_schedule_bounds() {
        assert!(FeeSchedule::new(9_999).is_ok());
        assert!(matches!(
            FeeSchedule::new(10_000),
            Err(AmmError::InvalidConfiguration { .. })
        ));
        assert_eq!(FeeSchedule::default().fee_bps(), REFERENCE_FEE_BPS);
    }

    #[test]
    fn test_mul_div_floor() {
        assert_eq!(mul_div_floor(2000, 1000, 2000, "t").unwrap(), 1000);
        assert_eq!(mul_div_floor(7, 3, 2, "t").unwrap(), 10);
        assert_eq!(mul_div_floor(u128::MAX, u128::MAX, u128::MAX, "t").unwrap(), u128::MAX);
        assert!(matches!(
            mul_div_floor(1, 1, 0, "t"),
            Err(AmmError::DivisionByZero { context: "t" })
        ));
        assert!(matches!(
            mul_div_floor(u128::MAX, 2, 1, "t"),
            Err(AmmError::ArithmeticOverflow { .. })
        ));
    }
}
