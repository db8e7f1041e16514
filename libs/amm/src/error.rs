//! Pool and ledger error types
//!
//! Every failure is surfaced to the caller immediately. Validation errors are
//! raised before any ledger mutation; ledger errors carry the collaborator's
//! diagnosis through unchanged.

use crate::types::{Address, Amount, Asset};
use thiserror::Error;

/// Failures reported by a ledger or share ledger collaborator
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Insufficient {asset} balance for {account}: need {needed}, have {available}")]
    InsufficientBalance {
        asset: Asset,
        account: Address,
        needed: Amount,
        available: Amount,
    },

    #[error("Insufficient {asset} allowance from {owner} to {spender}: need {needed}, approved {approved}")]
    InsufficientAllowance {
        asset: Asset,
        owner: Address,
        spender: Address,
        needed: Amount,
        approved: Amount,
    },

    #[error("Insufficient shares held by {account}: need {needed}, have {available}")]
    InsufficientShareBalance {
        account: Address,
        needed: Amount,
        available: Amount,
    },

    #[error("Balance or supply overflow while crediting {amount} to {account}")]
    SupplyOverflow { account: Address, amount: Amount },

    #[error("Ledger unavailable: {reason}")]
    Unavailable { reason: String },
}

/// Errors returned by pool operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmmError {
    /// Pool setup used a zero or conflicting address, or an impossible fee
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    /// Pricing was asked to quote against an empty side of the pool
    #[error("Invalid reserves: input {input_reserve}, output {output_reserve} (both must be positive)")]
    InvalidReserves {
        input_reserve: Amount,
        output_reserve: Amount,
    },

    /// Deposit offered less of the second asset than the pool ratio requires
    #[error("Insufficient offered amount: offered {offered}, pool ratio requires {required}")]
    InsufficientOfferedAmount { offered: Amount, required: Amount },

    #[error("Invalid amount: must be greater than zero")]
    InvalidAmount,

    #[error("Insufficient shares: requested {requested}, holder has {available}")]
    InsufficientShares { requested: Amount, available: Amount },

    #[error("Slippage exceeded: output {amount_out} below minimum {min_out}")]
    SlippageExceeded { amount_out: Amount, min_out: Amount },

    /// Requested output would drain the reserve entirely
    #[error("Insufficient liquidity: requested {requested}, reserve holds {reserve}")]
    InsufficientLiquidity { requested: Amount, reserve: Amount },

    #[error("Arithmetic overflow in {context}")]
    ArithmeticOverflow { context: &'static str },

    /// A ledger balance was smaller than the amount the caller claims it received
    #[error("Arithmetic underflow in {context}: {balance} is less than {subtrahend}")]
    ArithmeticUnderflow {
        context: &'static str,
        balance: Amount,
        subtrahend: Amount,
    },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: &'static str },

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

impl AmmError {
    pub(crate) fn config(reason: impl Into<String>) -> Self {
        AmmError::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    /// True for errors caused by caller input rather than pool or ledger state
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            AmmError::InsufficientOfferedAmount { .. }
                | AmmError::InvalidAmount
                | AmmError::InsufficientShares { .. }
                | AmmError::SlippageExceeded { .. }
                | AmmError::InsufficientLiquidity { .. }
        )
    }
}

pub type AmmResult<T> = Result<T, AmmError>;
