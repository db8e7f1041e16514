//! Pool Settings Module
//!
//! Loads pool settings from TOML files with environment-specific overrides.

use crate::defaults;
use anyhow::{bail, Context, Result};
use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Main settings structure
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PoolSettings {
    /// Pool deployment parameters
    pub pool: PoolSection,

    #[serde(default)]
    pub logging: LoggingSettings,

    /// Scripted activity for the simulator
    #[serde(default)]
    pub simulation: SimulationSettings,
}

/// Pool deployment parameters; addresses are `0x`-prefixed hex
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PoolSection {
    pub pool_account: String,
    pub second_token: String,
    #[serde(default = "default_fee_bps")]
    pub fee_bps: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingSettings {
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct SimulationSettings {
    #[serde(default)]
    pub accounts: Vec<AccountFunding>,
    #[serde(default)]
    pub deposits: Vec<DepositStep>,
    #[serde(default)]
    pub swaps: Vec<SwapStep>,
}

/// Starting balances for a simulated account
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AccountFunding {
    pub address: String,
    #[serde(default)]
    pub base: u64,
    #[serde(default)]
    pub second: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DepositStep {
    pub account: String,
    pub base: u64,
    pub second: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SwapSide {
    BaseForSecond,
    SecondForBase,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SwapStep {
    pub account: String,
    pub side: SwapSide,
    pub amount_in: u64,
    #[serde(default)]
    pub min_out: u64,
}

fn default_fee_bps() -> u32 {
    defaults::pool::FEE_BPS
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: defaults::logging::LEVEL.to_string(),
            json: false,
        }
    }
}

impl PoolSettings {
    /// Load settings from files with environment overrides
    pub fn load(base_path: Option<&Path>, environment: Option<&str>) -> Result<Self> {
        let base = base_path.unwrap_or(Path::new(defaults::sources::DEFAULT_SETTINGS_PATH));

        let mut builder = Config::builder().add_source(File::from(base).required(true));

        // Add environment-specific overrides if specified
        if let Some(env) = environment {
            let env_file = Self::environment_file(base, env);

            if env_file.exists() {
                info!("Loading environment settings: {:?}", env_file);
                builder = builder.add_source(File::from(env_file));
            } else {
                warn!("Environment settings not found: {:?}", env_file);
            }
        }

        // Override with environment variables (AMM_ prefix, `__` between sections)
        builder = builder.add_source(
            Environment::with_prefix(defaults::sources::ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build settings")?;

        let settings: Self = config
            .try_deserialize()
            .context("Failed to deserialize settings")?;
        debug!(fee_bps = settings.pool.fee_bps, "settings loaded");
        Ok(settings)
    }

    /// Expand `$VAR` / `${VAR}` references in address fields
    pub fn expand_env_vars(&mut self) -> Result<()> {
        self.pool.pool_account = expand(&self.pool.pool_account, "pool account")?;
        self.pool.second_token = expand(&self.pool.second_token, "second token")?;

        for account in &mut self.simulation.accounts {
            account.address = expand(&account.address, "simulation account")?;
        }
        for step in &mut self.simulation.deposits {
            step.account = expand(&step.account, "deposit account")?;
        }
        for step in &mut self.simulation.swaps {
            step.account = expand(&step.account, "swap account")?;
        }

        Ok(())
    }

    /// Reject settings the engine could never run with
    pub fn validate(&self) -> Result<()> {
        if !defaults::logging::LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            bail!(
                "Unknown log level '{}': expected one of {:?}",
                self.logging.level,
                defaults::logging::LEVELS
            );
        }
        if self.pool.pool_account == defaults::pool::ZERO_ADDRESS {
            bail!("Pool account must not be the zero address");
        }
        if self.pool.second_token == defaults::pool::ZERO_ADDRESS {
            bail!("Second token must not be the zero address");
        }
        Ok(())
    }

    /// Path of the overlay file for `environment` next to `base`
    pub fn environment_file(base: &Path, environment: &str) -> PathBuf {
        base.parent()
            .unwrap_or(Path::new("."))
            .join(defaults::sources::ENVIRONMENTS_DIR)
            .join(format!("{}.toml", environment))
    }
}

fn expand(value: &str, field: &str) -> Result<String> {
    let expanded = shellexpand::env(value).with_context(|| format!("Failed to expand {}", field))?;
    Ok(expanded.to_string())
}

/// Convenience function to load, expand and validate settings
pub fn load_settings(base_path: Option<&Path>, environment: Option<&str>) -> Result<PoolSettings> {
    let mut settings = PoolSettings::load(base_path, environment)?;
    settings.expand_env_vars()?;
    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const BASE: &str = r#"
[pool]
pool_account = "0x00000000000000000000000000000000000000aa"
second_token = "0x00000000000000000000000000000000000000bb"

[logging]
level = "debug"

[[simulation.accounts]]
address = "0x0000000000000000000000000000000000000001"
base = 5000
second = 5000

[[simulation.deposits]]
account = "0x0000000000000000000000000000000000000001"
base = 1000
second = 1000

[[simulation.swaps]]
account = "0x0000000000000000000000000000000000000001"
side = "base_for_second"
amount_in = 100
"#;

    #[test]
    fn test_load_base_settings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pool.toml");
        fs::write(&path, BASE).unwrap();

        let settings = PoolSettings::load(Some(&path), None).unwrap();

        assert_eq!(settings.pool.fee_bps, defaults::pool::FEE_BPS);
        assert_eq!(settings.logging.level, "debug");
        assert!(!settings.logging.json);
        assert_eq!(settings.simulation.accounts[0].base, 5000);
        assert_eq!(settings.simulation.deposits.len(), 1);
        assert_eq!(settings.simulation.swaps[0].side, SwapSide::BaseForSecond);
        assert_eq!(settings.simulation.swaps[0].min_out, 0);
    }

    #[test]
    fn test_environment_overlay() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pool.toml");
        fs::write(&path, BASE).unwrap();

        let overlay = PoolSettings::environment_file(&path, "staging");
        fs::create_dir_all(overlay.parent().unwrap()).unwrap();
        fs::write(&overlay, "[pool]\nfee_bps = 30\n\n[logging]\nlevel = \"warn\"\njson = true\n")
            .unwrap();

        let settings = PoolSettings::load(Some(&path), Some("staging")).unwrap();
        assert_eq!(settings.pool.fee_bps, 30);
        assert_eq!(settings.logging.level, "warn");
        assert!(settings.logging.json);
        assert!(settings.pool.pool_account.ends_with("aa"));
    }

    #[test]
    fn test_missing_overlay_is_not_fatal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pool.toml");
        fs::write(&path, BASE).unwrap();

        let settings = PoolSettings::load(Some(&path), Some("absent")).unwrap();
        assert_eq!(settings.pool.fee_bps, defaults::pool::FEE_BPS);
    }

    #[test]
    fn test_validate_rejects_zero_address() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pool.toml");
        fs::write(
            &path,
            format!(
                "[pool]\npool_account = \"0x00000000000000000000000000000000000000aa\"\nsecond_token = \"{}\"\n",
                defaults::pool::ZERO_ADDRESS
            ),
        )
        .unwrap();

        let err = load_settings(Some(&path), None).unwrap_err();
        assert!(err.to_string().contains("Second token"));
    }

    #[test]
    fn test_validate_rejects_unknown_log_level() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pool.toml");
        fs::write(&path, BASE).unwrap();

        let mut settings = PoolSettings::load(Some(&path), None).unwrap();
        assert!(settings.validate().is_ok());
        settings.logging.level = "verbose".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_missing_base_file_fails() {
        let dir = tempdir().unwrap();
        let result = PoolSettings::load(Some(&dir.path().join("nope.toml")), None);
        assert!(result.is_err());
    }
}
