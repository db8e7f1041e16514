//! Pool record and its deployment configuration
//!
//! A [`Pool`] owns handles to the asset ledger and the share ledger and
//! nothing else: reserves and share supply are always read fresh from the
//! ledgers, never cached between operations.

use crate::error::{AmmError, AmmResult};
use crate::ledger::{Ledger, ShareLedger};
use crate::math::{self, FeeSchedule};
use crate::types::{Address, Amount, Asset};
use amm_config::PoolSettings;
use tracing::info;

/// Validated deployment parameters, fixed for the life of a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    pool_account: Address,
    second_token: Address,
    fee: FeeSchedule,
}

impl PoolConfig {
    pub fn new(pool_account: Address, second_token: Address, fee: FeeSchedule) -> AmmResult<Self> {
        if pool_account.is_zero() {
            return Err(AmmError::config("pool account must not be the zero address"));
        }
        if second_token.is_zero() {
            return Err(AmmError::config("second token must not be the zero address"));
        }
        if pool_account == second_token {
            return Err(AmmError::config(format!(
                "pool account and second token are both {}",
                pool_account
            )));
        }
        Ok(Self {
            pool_account,
            second_token,
            fee,
        })
    }

    /// Build from loaded settings, parsing and validating every address
    pub fn from_settings(settings: &PoolSettings) -> AmmResult<Self> {
        let pool_account = settings
            .pool
            .pool_account
            .parse::<Address>()
            .map_err(|e| AmmError::config(format!("pool account: {}", e)))?;
        let second_token = settings
            .pool
            .second_token
            .parse::<Address>()
            .map_err(|e| AmmError::config(format!("second token: {}", e)))?;
        let fee = FeeSchedule::new(settings.pool.fee_bps)?;
        Self::new(pool_account, second_token, fee)
    }

    pub fn pool_account(&self) -> Address {
        self.pool_account
    }

    pub fn second_asset(&self) -> Asset {
        Asset::Token(self.second_token)
    }

    pub fn fee(&self) -> FeeSchedule {
        self.fee
    }
}

/// A constant-product pool over a base asset and one second token
#[derive(Debug)]
pub struct Pool<L, S> {
    pub(crate) config: PoolConfig,
    pub(crate) ledger: L,
    pub(crate) shares: S,
}

impl<L: Ledger, S: ShareLedger> Pool<L, S> {
    pub fn new(config: PoolConfig, ledger: L, shares: S) -> Self {
        info!(
            pool = %config.pool_account,
            second = %config.second_asset(),
            fee_bps = config.fee.fee_bps(),
            "pool created"
        );
        Self {
            config,
            ledger,
            shares,
        }
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Host-side access, e.g. to attach base value before a call
    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    pub fn shares(&self) -> &S {
        &self.shares
    }

    pub fn shares_mut(&mut self) -> &mut S {
        &mut self.shares
    }

    pub fn into_parts(self) -> (PoolConfig, L, S) {
        (self.config, self.ledger, self.shares)
    }

    /// Output amount for a swap of `input_amount` at this pool's fee
    pub fn quote_output(
        &self,
        input_amount: Amount,
        input_reserve: Amount,
        output_reserve: Amount,
    ) -> AmmResult<Amount> {
        math::quote_output_with_fee(self.config.fee, input_amount, input_reserve, output_reserve)
    }

    /// Smallest input that yields at least `output_amount` at this pool's fee
    pub fn quote_input(
        &self,
        output_amount: Amount,
        input_reserve: Amount,
        output_reserve: Amount,
    ) -> AmmResult<Amount> {
        math::quote_input_with_fee(self.config.fee, output_amount, input_reserve, output_reserve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amm_config::{LoggingSettings, PoolSection, SimulationSettings};

    fn settings(pool: &str, token: &str, fee_bps: u32) -> PoolSettings {
        PoolSettings {
            pool: PoolSection {
                pool_account: pool.to_string(),
                second_token: token.to_string(),
                fee_bps,
            },
            logging: LoggingSettings::default(),
            simulation: SimulationSettings::default(),
        }
    }

    #[test]
    fn test_zero_addresses_rejected() {
        let fee = FeeSchedule::default();
        assert!(matches!(
            PoolConfig::new(Address::ZERO, Address::from_low_byte(2), fee),
            Err(AmmError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            PoolConfig::new(Address::from_low_byte(1), Address::ZERO, fee),
            Err(AmmError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            PoolConfig::new(Address::from_low_byte(1), Address::from_low_byte(1), fee),
            Err(AmmError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_from_settings() {
        let config = PoolConfig::from_settings(&settings(
            "0x00000000000000000000000000000000000000aa",
            "0x00000000000000000000000000000000000000bb",
            30,
        ))
        .unwrap();
        assert_eq!(config.pool_account(), Address::from_low_byte(0xaa));
        assert_eq!(config.second_asset(), Asset::Token(Address::from_low_byte(0xbb)));
        assert_eq!(config.fee().fee_bps(), 30);
    }

    #[test]
    fn test_from_settings_rejects_bad_values() {
        let bad_hex = settings("0xnothex", "0x00000000000000000000000000000000000000bb", 100);
        assert!(matches!(
            PoolConfig::from_settings(&bad_hex),
            Err(AmmError::InvalidConfiguration { .. })
        ));

        let bad_fee = settings(
            "0x00000000000000000000000000000000000000aa",
            "0x00000000000000000000000000000000000000bb",
            10_000,
        );
        assert!(matches!(
            PoolConfig::from_settings(&bad_fee),
            Err(AmmError::InvalidConfiguration { .. })
        ));
    }
}
