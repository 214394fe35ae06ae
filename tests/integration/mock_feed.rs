//! Mock price feed for integration testing.
//!
//! Provides a deterministic `PriceFeed` that replays a scripted sequence
//! of prices and failures, all in-memory with no network access.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tradebot::engine::controller::BotController;
use tradebot::engine::logger::BotLogger;
use tradebot::engine::worker::WorkerSettings;
use tradebot::feed::PriceFeed;
use tradebot::types::{BotStatus, FeedError};

/// What the feed does once the script runs out.
#[derive(Debug, Clone, Copy)]
pub enum WhenExhausted {
    /// Keep failing with a network error.
    Fail,
    /// Keep returning this price.
    Repeat(f64),
}

pub struct ScriptedFeed {
    script: Mutex<VecDeque<Result<f64, FeedError>>>,
    exhausted: WhenExhausted,
    calls: AtomicUsize,
}

impl ScriptedFeed {
    pub fn new(script: Vec<Result<f64, FeedError>>, exhausted: WhenExhausted) -> Self {
        Self {
            script: Mutex::new(script.into()),
            exhausted,
            calls: AtomicUsize::new(0),
        }
    }

    /// A feed that always returns `price`.
    pub fn steady(price: f64) -> Self {
        Self::new(Vec::new(), WhenExhausted::Repeat(price))
    }

    /// Prices in order, then failures forever.
    pub fn prices(prices: &[f64]) -> Self {
        Self::new(prices.iter().map(|p| Ok(*p)).collect(), WhenExhausted::Fail)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

pub fn failure(symbol: &str) -> Result<f64, FeedError> {
    Err(FeedError::network(symbol, "simulated outage"))
}

#[async_trait]
impl PriceFeed for ScriptedFeed {
    async fn fetch_price(&self, symbol: &str) -> Result<f64, FeedError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(result) => result,
            None => match self.exhausted {
                WhenExhausted::Fail => Err(FeedError::network(symbol, "script exhausted")),
                WhenExhausted::Repeat(price) => Ok(price),
            },
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Millisecond-scale intervals so loops turn over quickly in tests.
pub fn fast_settings() -> WorkerSettings {
    WorkerSettings {
        poll_interval: Duration::from_millis(10),
        retry_interval: Duration::from_millis(10),
    }
}

pub fn controller(feed: Arc<ScriptedFeed>, settings: WorkerSettings) -> BotController {
    BotController::new(
        BotStatus::new("BTCUSDT", 1.0),
        Arc::new(BotLogger::default()),
        feed,
        settings,
    )
}

/// Poll `condition` every few milliseconds until it holds or `timeout`
/// elapses. Returns whether it held.
pub async fn wait_until<F>(timeout: Duration, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let waited = tokio::time::timeout(timeout, async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    })
    .await;
    waited.is_ok()
}

/// Run `fut` with a generous deadline so a hung worker fails the test
/// instead of hanging it.
pub async fn within<T>(fut: impl Future<Output = T>) -> T {
    tokio::time::timeout(Duration::from_secs(5), fut)
        .await
        .expect("timed out")
}
