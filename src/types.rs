//! Shared types for the trading bot.
//!
//! These types form the data model used across all modules:
//! the bot status snapshot, log entries, and the error taxonomy.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Bot status
// ---------------------------------------------------------------------------

/// Configuration and live state of the bot.
///
/// Serialized field names match the HTTP API (`profit_percentage`, and
/// `null` for absent prices).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotStatus {
    /// True iff a worker loop is permitted to run.
    pub running: bool,
    /// Trading pair, fixed for the lifetime of a session.
    pub symbol: String,
    /// Sell threshold relative to the buy price, in percent.
    #[serde(rename = "profit_percentage")]
    pub profit_target_percent: f64,
    /// Entry price of the simulated position, if one is open.
    pub buy_price: Option<f64>,
    /// Most recently observed price.
    pub last_price: Option<f64>,
}

impl BotStatus {
    /// Initial status at process start: stopped, flat, no price seen yet.
    pub fn new(symbol: impl Into<String>, profit_target_percent: f64) -> Self {
        Self {
            running: false,
            symbol: symbol.into(),
            profit_target_percent,
            buy_price: None,
            last_price: None,
        }
    }

    /// The simulated position implied by `buy_price`.
    pub fn position(&self) -> Position {
        match self.buy_price {
            Some(buy_price) => Position::Holding { buy_price },
            None => Position::Flat,
        }
    }
}

impl fmt::Display for BotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.running { "RUNNING" } else { "STOPPED" };
        write!(
            f,
            "[{state}] {} target={}% position={}",
            self.symbol, self.profit_target_percent, self.position()
        )?;
        if let Some(price) = self.last_price {
            write!(f, " last=${price:.2}")?;
        }
        Ok(())
    }
}

/// Simulated holding state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Position {
    Flat,
    Holding { buy_price: f64 },
}

impl Position {
    /// Price at which a holding is sold for the given profit target.
    /// `None` when flat.
    pub fn target_sell_price(&self, profit_target_percent: f64) -> Option<f64> {
        match self {
            Position::Flat => None,
            Position::Holding { buy_price } => {
                Some(buy_price * (1.0 + profit_target_percent / 100.0))
            }
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Flat => write!(f, "FLAT"),
            Position::Holding { buy_price } => write!(f, "HOLDING@{buy_price:.2}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Log entries
// ---------------------------------------------------------------------------

/// A single line of the bot's event log.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.message
        )
    }
}

// ---------------------------------------------------------------------------
// Control-surface results
// ---------------------------------------------------------------------------

/// A `start` request was accepted and a worker spawned.
#[derive(Debug, Clone, PartialEq)]
pub struct StartAccepted {
    pub profit_target_percent: f64,
}

impl StartAccepted {
    pub fn message(&self) -> &'static str {
        "Bot started successfully"
    }
}

/// A `stop` request was accepted; the worker halts on its next iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopAccepted;

impl StopAccepted {
    pub fn message(&self) -> &'static str {
        "Bot stopped successfully"
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Failure to obtain a price. Timeouts, bad status codes and malformed
/// bodies all collapse into this one variant and are retried identically.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FeedError {
    #[error("failed to fetch {symbol} price: {reason}")]
    NetworkFailure { symbol: String, reason: String },
}

impl FeedError {
    pub fn network(symbol: &str, reason: impl fmt::Display) -> Self {
        FeedError::NetworkFailure {
            symbol: symbol.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Rejected control request. Nothing is mutated when one of these is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ControlError {
    #[error("Bot is already running")]
    AlreadyRunning,

    #[error("Bot is not running")]
    NotRunning,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
