//! Commission rate configuration loading from config.toml
//!
//! The platform and agent rates live in a single injected value instead of
//! being repeated at call sites. Rates are fractions of a booking's total
//! price and are independent of each other; they are not required to sum
//! to 1, since the remainder funds the partner payout outside this engine.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_AGENT_RATE: f64 = 0.10;
const DEFAULT_PLATFORM_RATE: f64 = 0.15;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Commission rate split applied to confirmed bookings
    pub commission: CommissionRates,
}

/// The platform's commission rate split.
///
/// Injected into the commission calculator and accrual aggregator;
/// nothing else in the crate hardcodes a rate.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct CommissionRates {
    /// Fraction of a confirmed booking's total owed to the referring agent
    #[serde(default = "default_agent_rate")]
    pub agent_rate: f64,
    /// Fraction of a confirmed booking's total retained by the platform
    #[serde(default = "default_platform_rate")]
    pub platform_rate: f64,
}

const fn default_agent_rate() -> f64 {
    DEFAULT_AGENT_RATE
}

const fn default_platform_rate() -> f64 {
    DEFAULT_PLATFORM_RATE
}

impl Default for CommissionRates {
    fn default() -> Self {
        Self {
            agent_rate: DEFAULT_AGENT_RATE,
            platform_rate: DEFAULT_PLATFORM_RATE,
        }
    }
}

impl CommissionRates {
    /// Returns a copy with the agent side replaced by a per-agent override.
    ///
    /// Agents carry their own stored rate (defaulted from this config at
    /// registration); the platform side always comes from configuration.
    #[must_use]
    pub const fn with_agent_rate(self, agent_rate: f64) -> Self {
        Self {
            agent_rate,
            platform_rate: self.platform_rate,
        }
    }

    /// Validates that both rates are finite fractions in `[0, 1]`.
    ///
    /// # Errors
    /// Returns `Error::Config` naming the offending rate otherwise.
    pub fn validate(&self) -> Result<()> {
        for (name, rate) in [
            ("agent_rate", self.agent_rate),
            ("platform_rate", self.platform_rate),
        ] {
            if !rate.is_finite() || !(0.0..=1.0).contains(&rate) {
                return Err(Error::Config {
                    message: format!("{name} must be a fraction between 0 and 1, got {rate}"),
                });
            }
        }
        Ok(())
    }
}

/// Loads commission configuration from a TOML file
///
/// # Arguments
/// * `path` - Path to the config.toml file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A rate is outside `[0, 1]` or not finite
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    let config: Config = toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;

    config.commission.validate()?;
    Ok(config)
}

/// Loads commission configuration from the default location (./config.toml)
pub fn load_default_config() -> Result<Config> {
    load_config("config.toml")
}

/// Loads rates from ./config.toml, falling back to the built-in defaults
/// when the file does not exist. Parse and validation failures still error;
/// a present-but-broken config should never be silently replaced.
pub fn load_or_default() -> Result<CommissionRates> {
    if Path::new("config.toml").exists() {
        Ok(load_default_config()?.commission)
    } else {
        Ok(CommissionRates::default())
    }
}
