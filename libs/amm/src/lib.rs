//! # Constant-Product AMM Core
//!
//! ## Purpose
//!
//! Accounting engine for a two-asset constant-product pool: a native base
//! asset and one second token. Liquidity providers deposit both assets and
//! receive proportional ownership shares; traders swap one asset for the
//! other, paying a fee that stays in the pool.
//!
//! ## Integration Points
//!
//! - **Asset balances**: any [`Ledger`] implementation (balance reads,
//!   transfers, allowance-gated pulls)
//! - **Ownership shares**: any [`ShareLedger`] implementation
//! - **Base inflow**: base value is attached by the host before an operation
//!   runs; operations take the attached amount as a parameter and subtract it
//!   to recover the pre-call reserve
//!
//! ## Architecture Role
//!
//! - [`reserves`]: fresh reads of both reserves and share supply
//! - [`liquidity`]: share issuance and redemption
//! - [`math`]: fee-adjusted constant-product quotes
//! - [`swap`]: slippage-checked swaps in both directions
//! - [`shared`]: single-lock wrapper for hosts that run calls concurrently
//!
//! ## Arithmetic
//!
//! Amounts are `u128`; every product is formed in 256 bits and every
//! division floors in the pool's favour. Overflow, underflow and division by
//! zero surface as [`AmmError`] variants rather than wrapping or panicking.
//!
//! ## Known gaps
//!
//! - No minimum-liquidity lock: the first depositor sets the price and can
//!   be front-run.
//! - A deposit into a non-empty pool pulls only the ratio-required second
//!   amount; any larger offer is neither pulled nor refunded.
//! - A first deposit must attach non-zero base. Shares track base 1:1 on an
//!   empty pool, so a zero-base deposit would mint nothing over a funded
//!   pool; it is rejected with `InvalidAmount`.
//! - `SharedPool` attaches base under the pool lock and refunds it when the
//!   operation fails. Other effects of a partially applied deposit are left
//!   to the host's rollback.

pub mod error;
pub mod ledger;
pub mod liquidity;
pub mod math;
pub mod pool;
pub mod reserves;
pub mod shared;
pub mod swap;
pub mod types;

pub use error::{AmmError, AmmResult, LedgerError};
pub use ledger::{Ledger, MemoryLedger, MemoryShareLedger, ShareLedger};
pub use liquidity::{plan_deposit, plan_withdrawal, DepositPlan, WithdrawalPlan};
pub use math::{
    mul_div_floor, quote_input_with_fee, quote_output_with_fee, FeeSchedule, BPS_DENOMINATOR,
    REFERENCE_FEE_BPS,
};
pub use pool::{Pool, PoolConfig};
pub use reserves::PoolSnapshot;
pub use shared::SharedPool;
pub use types::{Address, Amount, Asset, U256};

/// Display-only price type
pub use rust_decimal::Decimal;
