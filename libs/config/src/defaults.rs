//! Default values shared by the settings loader and the pool engine

/// Pool defaults
pub mod pool {
    /// Swap fee in basis points (1%)
    pub const FEE_BPS: u32 = 100;

    /// Zero address; rejected for both the pool account and the second token
    pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";
}

/// Logging defaults
pub mod logging {
    pub const LEVEL: &str = "info";

    /// Accepted values for `logging.level`
    pub const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
}

/// Settings file locations and environment overrides
pub mod sources {
    /// Base settings file used when no path is given
    pub const DEFAULT_SETTINGS_PATH: &str = "config/pool.toml";

    /// Directory (relative to the base file) holding per-environment overlays
    pub const ENVIRONMENTS_DIR: &str = "environments";

    /// Prefix for environment overrides, e.g. `AMM_POOL__FEE_BPS=30`
    pub const ENV_PREFIX: &str = "AMM";
}
