use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

// ============================================================================
// Application Configuration - environment variables with defaults
// ============================================================================

pub const DEFAULT_LOG_FILTER: &str = "info,delivery_dispatch=debug";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Scheduler tick: one dispatch attempt and one movement step
    pub tick_interval: Duration,
    /// Ticks to run before giving up on undelivered orders
    pub max_ticks: u32,
    /// Demo orders created at startup
    pub demo_orders: u32,
    /// Used when RUST_LOG is not set
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(200),
            max_ticks: 50,
            demo_orders: 5,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, so it can be tested without
    /// touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let tick_ms = parse_or(&lookup, "DELIVERY_TICK_MS", defaults.tick_interval.as_millis() as u64)?;
        let max_ticks = parse_or(&lookup, "DELIVERY_MAX_TICKS", defaults.max_ticks)?;
        let demo_orders = parse_or(&lookup, "DELIVERY_ORDERS", defaults.demo_orders)?;
        let log_filter = lookup("DELIVERY_LOG").unwrap_or(defaults.log_filter);

        if tick_ms == 0 {
            anyhow::bail!("DELIVERY_TICK_MS must be greater than zero");
        }

        Ok(Self {
            tick_interval: Duration::from_millis(tick_ms),
            max_ticks,
            demo_orders,
            log_filter,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {}: {:?}", key, raw)),
        None => Ok(default),
    }
}
