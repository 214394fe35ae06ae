//! Trading worker: the poll, decide, record loop.
//!
//! One worker runs per session. It buys as soon as it is flat, then
//! holds until the price reaches `buy_price * (1 + target/100)` and sells.
//! Fetch failures are logged and retried forever; the loop only ends
//! when `running` goes false or a newer session has taken over.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::logger::BotLogger;
use super::status::StatusStore;
use crate::feed::PriceFeed;
use crate::types::Position;

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Loop timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerSettings {
    /// Pause after every completed decision.
    pub poll_interval: Duration,
    /// Pause after a failed fetch.
    pub retry_interval: Duration,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            retry_interval: Duration::from_secs(5),
        }
    }
}

// ---------------------------------------------------------------------------
// Iteration outcome
// ---------------------------------------------------------------------------

/// What a single iteration did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// `running` was false or the session ended; the loop exits.
    Halted,
    /// The price fetch failed; nothing was mutated.
    FetchFailed,
    /// Was flat, opened a position at `price`.
    Bought { price: f64 },
    /// Holding, target not reached yet.
    Monitoring { price: f64, target: f64 },
    /// Holding, target reached; position closed.
    Sold { price: f64, profit: f64 },
}

// ---------------------------------------------------------------------------
// Worker
// ---------------------------------------------------------------------------

pub struct TradingWorker {
    session: u64,
    store: Arc<StatusStore>,
    log: Arc<BotLogger>,
    feed: Arc<dyn PriceFeed>,
    settings: WorkerSettings,
}

impl TradingWorker {
    /// Bind a worker to `session`. It halts as soon as the store moves on
    /// to a different session.
    pub fn new(
        session: u64,
        store: Arc<StatusStore>,
        log: Arc<BotLogger>,
        feed: Arc<dyn PriceFeed>,
        settings: WorkerSettings,
    ) -> Self {
        Self {
            session,
            store,
            log,
            feed,
            settings,
        }
    }

    pub fn session(&self) -> u64 {
        self.session
    }

    /// Run until halted. Never returns an error.
    pub async fn run(self) {
        info!(session = self.session, feed = self.feed.name(), "Trading worker started");
        self.log.append("Trading worker started...");

        loop {
            let pause = match self.tick().await {
                TickOutcome::Halted => break,
                TickOutcome::FetchFailed => self.settings.retry_interval,
                _ => self.settings.poll_interval,
            };
            tokio::time::sleep(pause).await;
        }

        info!(session = self.session, "Trading worker stopped");
        self.log.append("Trading worker stopped.");
    }

    /// Run one iteration of the state machine.
    pub async fn tick(&self) -> TickOutcome {
        let (status, session) = self.store.session_snapshot();
        if !status.running || session != self.session {
            return TickOutcome::Halted;
        }
        let symbol = status.symbol.as_str();

        // No lock is held across the fetch.
        let price = match self.feed.fetch_price(symbol).await {
            Ok(price) => price,
            Err(e) => {
                warn!(symbol, error = %e, "Price fetch failed, retrying");
                self.log.append(format!("Error: {e}"));
                return TickOutcome::FetchFailed;
            }
        };

        let outcome = match status.position() {
            Position::Flat => TickOutcome::Bought { price },
            Position::Holding { buy_price } => {
                let target = buy_price * (1.0 + status.profit_target_percent / 100.0);
                if price >= target {
                    // Quantity is fixed at one unit.
                    TickOutcome::Sold {
                        price,
                        profit: price - buy_price,
                    }
                } else {
                    TickOutcome::Monitoring { price, target }
                }
            }
        };

        // Price, position change and the decision's log line land together,
        // or not at all once the session has moved on. The log lock nests
        // inside the status lock and never the other way round.
        let applied = self.store.update_session(self.session, |s| {
            s.last_price = Some(price);
            match outcome {
                TickOutcome::Bought { price } => {
                    s.buy_price = Some(price);
                    self.log
                        .append(format!("Simulated buy: bought {symbol} at ${price:.2}"));
                }
                TickOutcome::Sold { price, profit } => {
                    self.log.append(format!(
                        "Simulated sell: sold {symbol} at ${price:.2}, profit ${profit:.2}!"
                    ));
                    s.buy_price = None;
                }
                TickOutcome::Monitoring { price, target } => {
                    self.log.append(format!(
                        "Monitoring... | current price: ${price:.2} | target sell price: ${target:.2}"
                    ));
                }
                TickOutcome::Halted | TickOutcome::FetchFailed => {}
            }
        });
        if !applied {
            return TickOutcome::Halted;
        }

        if let TickOutcome::Monitoring { price, target } = outcome {
            debug!(symbol, price, target, "Target not reached");
        }
        outcome
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
