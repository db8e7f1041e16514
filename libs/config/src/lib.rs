//! # Pool Settings
//!
//! Layered configuration for the constant-product pool engine and its
//! simulator. Settings come from a base TOML file, an optional
//! per-environment overlay, and `AMM_`-prefixed environment variables, in
//! that order of precedence.
//!
//! ## Usage
//!
//! ```no_run
//! use amm_config::load_settings;
//! use std::path::Path;
//!
//! let settings = load_settings(Some(Path::new("config/pool.toml")), Some("dev")).unwrap();
//! println!("fee: {} bps", settings.pool.fee_bps);
//! ```

pub mod defaults;
pub mod settings;

pub use settings::{
    load_settings, AccountFunding, DepositStep, LoggingSettings, PoolSection, PoolSettings,
    SimulationSettings, SwapStep, SwapSide,
};
