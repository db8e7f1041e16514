//! Pool simulator - replays scripted deposits and swaps against in-memory ledgers
//!
//! Built only with the `sim` feature.
//!
//! Usage:
//!   cargo run -p amm-core --features sim --bin pool-sim -- --config config/pool.toml
//!   pool-sim --config config/pool.toml
//!   pool-sim --config config/pool.toml --environment staging --json-logs

use amm_config::{load_settings, PoolSettings, SwapSide};
use amm_core::{Address, Asset, MemoryLedger, MemoryShareLedger, Pool, PoolConfig};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pool-sim")]
#[command(about = "Replay scripted liquidity and swap activity against a constant-product pool")]
#[command(version)]
struct Args {
    /// Path to settings file
    #[arg(short, long, default_value = "config/pool.toml")]
    config: PathBuf,

    /// Environment overlay to apply (config/environments/<name>.toml)
    #[arg(short, long)]
    environment: Option<String>,

    /// Log level override (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Enable JSON logging format
    #[arg(long)]
    json_logs: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let settings = load_settings(Some(&args.config), args.environment.as_deref())
        .with_context(|| format!("Failed to load settings from {:?}", args.config))?;

    init_logging(&args, &settings);
    info!("Loaded settings from {:?}", args.config);

    let summary = run(&settings).map_err(|e| {
        error!("Simulation failed: {:#}", e);
        e
    })?;

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn init_logging(args: &Args, settings: &PoolSettings) {
    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| settings.logging.level.clone());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if args.json_logs || settings.logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn parse_address(value: &str) -> Result<Address> {
    value
        .parse()
        .with_context(|| format!("Invalid address '{}'", value))
}

fn run(settings: &PoolSettings) -> Result<amm_core::PoolSnapshot> {
    let config = PoolConfig::from_settings(settings)?;
    let pool_account = config.pool_account();
    let second = config.second_asset();

    let mut ledger = MemoryLedger::new();
    for account in &settings.simulation.accounts {
        let address = parse_address(&account.address)?;
        ledger.credit(Asset::Base, address, account.base.into())?;
        ledger.credit(second, address, account.second.into())?;
        // Simulated accounts trust the pool with their whole second balance
        ledger.approve(second, address, pool_account, u128::MAX);
    }

    let mut pool = Pool::new(config, ledger, MemoryShareLedger::new());

    for step in &settings.simulation.deposits {
        let caller = parse_address(&step.account)?;
        pool.ledger_mut()
            .attach_value(caller, pool_account, step.base.into())?;
        let shares = pool
            .add_liquidity(caller, step.base.into(), step.second.into())
            .with_context(|| format!("Deposit by {} failed", caller))?;
        info!(%caller, shares, "deposit complete");
    }

    for step in &settings.simulation.swaps {
        let caller = parse_address(&step.account)?;
        let amount_in = u128::from(step.amount_in);
        let min_out = u128::from(step.min_out);
        let amount_out = match step.side {
            SwapSide::BaseForSecond => {
                pool.ledger_mut()
                    .attach_value(caller, pool_account, amount_in)?;
                pool.swap_base_for_second(caller, amount_in, min_out)
            }
            SwapSide::SecondForBase => pool.swap_second_for_base(caller, amount_in, min_out),
        }
        .with_context(|| format!("Swap by {} failed", caller))?;
        info!(%caller, side = ?step.side, amount_in, amount_out, "swap complete");
    }

    let snapshot = pool.snapshot()?;
    if let Ok(price) = pool.spot_price() {
        info!(%price, "final spot price (second per base)");
    }
    Ok(snapshot)
}
