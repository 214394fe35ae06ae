//! Price feeds.
//!
//! Defines the `PriceFeed` trait the trading worker polls, and the
//! Binance public ticker implementation used by the binary.

pub mod binance;

use async_trait::async_trait;

use crate::types::FeedError;

/// Abstraction over "fetch the current price for a symbol".
///
/// Implementors map every kind of failure to `FeedError::NetworkFailure`;
/// callers never need to tell a timeout from a malformed response.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PriceFeed: Send + Sync {
    /// Fetch the latest price for `symbol`.
    async fn fetch_price(&self, symbol: &str) -> Result<f64, FeedError>;

    /// Feed name for logging.
    fn name(&self) -> &'static str;
}
