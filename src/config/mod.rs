//! Environment-derived configuration
//!
//! The sweeper has no CLI surface; everything is parameterized through the
//! environment (optionally loaded from a `.env` file). A network selector
//! picks one of two fixed endpoint variable sets, and the presence of each
//! named variable determines whether that provider participates in the sweep.

use crate::defaults;
use crate::error::{AppError, Result};
use std::path::Path;
use std::time::Duration;

/// Endpoint variables probed when `NETWORK=polygon`.
const POLYGON_ENDPOINT_VARS: &[&str] = &[
    "POLYGON_INHOUSE_1_WS",
    "POLYGON_INHOUSE_1_HTTP",
    "POLYGON_INHOUSE_2_WS",
    "POLYGON_INHOUSE_2_HTTP",
    "POLYGON_QUICKNODE_WS",
    "POLYGON_QUICKNODE_HTTP",
    "POLYGON_CHAINSTACK_1_WS",
    "POLYGON_CHAINSTACK_1_HTTP",
    "POLYGON_CHAINSTACK_2_WS",
    "POLYGON_CHAINSTACK_2_HTTP",
];

/// Endpoint variables probed for the Amoy testnet (the default).
const AMOY_ENDPOINT_VARS: &[&str] = &[
    "AMOY_INHOUSE_1_WS",
    "AMOY_INHOUSE_1_HTTP",
    "AMOY_INHOUSE_2_WS",
    "AMOY_INHOUSE_2_HTTP",
    "AMOY_QUICKNODE_WS",
    "AMOY_QUICKNODE_HTTP",
    "AMOY_CHAINSTACK_WS",
    "AMOY_CHAINSTACK_HTTP",
];

/// A named endpoint selected from the environment, not yet connected.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointSpec {
    /// Provider name: the lowercased environment variable name
    pub name: String,
    /// Connection string as given in the environment
    pub url: String,
}

/// Complete runtime configuration for one sweep run
#[derive(Debug, Clone)]
pub struct Config {
    /// Network selector (`polygon` or anything else for Amoy)
    pub network: String,
    /// Endpoints that had a value set in the environment
    pub endpoints: Vec<EndpointSpec>,
    /// Call rates to sweep, in calls per second
    pub call_rates: Vec<u32>,
    /// Duration of each sweep
    pub duration: Duration,
    /// Settlement deadline for in-flight calls after the last tick
    pub grace_period: Duration,
    /// Number of random addresses to generate
    pub address_pool_size: usize,
    /// Directory for CSV and chart output
    pub output_dir: String,
    /// Contract address targeted by the measured `eth_call`
    pub call_target: String,
    /// 4-byte function selector (hex, no 0x prefix)
    pub call_selector: String,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup. Split out
    /// from [`Config::from_env`] so tests can supply variables without
    /// touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let network = lookup("NETWORK").unwrap_or_else(|| "amoy".to_string());

        let endpoint_vars = if network == "polygon" {
            POLYGON_ENDPOINT_VARS
        } else {
            AMOY_ENDPOINT_VARS
        };

        let mut endpoints = Vec::new();
        for var in endpoint_vars {
            if let Some(url) = lookup(var) {
                let url = url.trim().to_string();
                if !url.is_empty() {
                    endpoints.push(EndpointSpec {
                        name: var.to_lowercase(),
                        url,
                    });
                }
            }
        }

        let call_rates = match lookup("CALL_RATES") {
            Some(raw) => parse_call_rates(&raw)?,
            None => defaults::DEFAULT_CALL_RATES.to_vec(),
        };

        let duration = match lookup("DURATION_SECONDS") {
            Some(raw) => Duration::from_secs(parse_bounded(&raw, "DURATION_SECONDS", 1, 3600)?),
            None => defaults::DEFAULT_DURATION,
        };

        let grace_period = match lookup("GRACE_PERIOD_MS") {
            Some(raw) => Duration::from_millis(parse_bounded(&raw, "GRACE_PERIOD_MS", 0, 600_000)?),
            None => defaults::DEFAULT_GRACE_PERIOD,
        };

        let address_pool_size = match lookup("ADDRESS_POOL_SIZE") {
            Some(raw) => parse_bounded(&raw, "ADDRESS_POOL_SIZE", 1, 10_000_000)? as usize,
            None => defaults::DEFAULT_ADDRESS_POOL_SIZE,
        };

        let output_dir = lookup("OUTPUT_DIR").unwrap_or_else(|| defaults::DEFAULT_OUTPUT_DIR.to_string());

        let call_target = lookup("CALL_TARGET").unwrap_or_else(|| defaults::DEFAULT_CALL_TARGET.to_string());
        validate_address(&call_target)?;

        let call_selector = lookup("CALL_SELECTOR").unwrap_or_else(|| defaults::DEFAULT_CALL_SELECTOR.to_string());
        validate_selector(&call_selector)?;

        Ok(Self {
            network,
            endpoints,
            call_rates,
            duration,
            grace_period,
            address_pool_size,
            output_dir,
            call_target,
            call_selector,
        })
    }

    /// Total number of (provider, call-rate) sweeps this configuration runs.
    pub fn sweep_count(&self) -> usize {
        self.endpoints.len() * self.call_rates.len()
    }
}

/// Load `.env` from the current directory if it exists. Already-set process
/// variables win over file values, matching dotenv semantics.
pub fn load_env_file() -> Result<()> {
    if Path::new(".env").exists() {
        dotenv::from_filename(".env")
            .map_err(|e| AppError::config(format!("Failed to load .env file: {}", e)))?;
    }
    Ok(())
}

fn parse_call_rates(raw: &str) -> Result<Vec<u32>> {
    let mut rates = Vec::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let rate: u32 = part
            .parse()
            .map_err(|e| AppError::config(format!("Invalid CALL_RATES entry '{}': {}", part, e)))?;
        if rate == 0 || rate > 10_000 {
            return Err(AppError::config(format!(
                "CALL_RATES entries must be between 1 and 10000, got: {}",
                rate
            )));
        }
        rates.push(rate);
    }
    if rates.is_empty() {
        return Err(AppError::config("CALL_RATES must contain at least one rate"));
    }
    Ok(rates)
}

fn parse_bounded(raw: &str, key: &str, min: u64, max: u64) -> Result<u64> {
    let value: u64 = raw
        .trim()
        .parse()
        .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, raw, e)))?;
    if value < min || value > max {
        return Err(AppError::config(format!(
            "{} must be between {} and {}, got: {}",
            key, min, max, value
        )));
    }
    Ok(value)
}

fn validate_address(addr: &str) -> Result<()> {
    let hex = addr.strip_prefix("0x").unwrap_or(addr);
    if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(AppError::config(format!(
            "CALL_TARGET must be a 20-byte hex address, got: {}",
            addr
        )));
    }
    Ok(())
}

fn validate_selector(selector: &str) -> Result<()> {
    if selector.len() != 8 || !selector.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(AppError::config(format!(
            "CALL_SELECTOR must be 8 hex characters, got: {}",
            selector
        )));
    }
    Ok(())
}
