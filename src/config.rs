//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Every field has a default, so a missing section or key falls back to
//! the values the bot ships with (BTCUSDT, 1% target, 5s polling).

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::time::Duration;

use crate::engine::worker::WorkerSettings;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BotConfig {
    /// Trading pair, e.g. "BTCUSDT".
    pub symbol: String,
    /// Profit target used when a start request doesn't carry one.
    pub default_profit_percentage: f64,
    pub poll_interval_secs: u64,
    pub retry_interval_secs: u64,
    /// Maximum number of lines kept in the bot log.
    pub log_capacity: usize,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            symbol: "BTCUSDT".to_string(),
            default_profit_percentage: 1.0,
            poll_interval_secs: 5,
            retry_interval_secs: 5,
            log_capacity: 100,
        }
    }
}

impl BotConfig {
    /// Worker timing derived from this config.
    pub fn worker_settings(&self) -> WorkerSettings {
        WorkerSettings {
            poll_interval: Duration::from_secs(self.poll_interval_secs),
            retry_interval: Duration::from_secs(self.retry_interval_secs),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FeedConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.binance.com".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DashboardConfig {
    pub host: String,
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        Ok(config)
    }
}
