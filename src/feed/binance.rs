//! Binance public ticker.
//!
//! API docs: https://binance-docs.github.io/apidocs/spot/en/#symbol-price-ticker
//! Endpoint: GET /api/v3/ticker/price?symbol=BTCUSDT
//! Auth: none. Weight 2 per symbol, so keep polling slow.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::PriceFeed;
use crate::config::FeedConfig;
use crate::types::FeedError;

const FEED_NAME: &str = "binance";

/// Ticker response. Binance sends the price as a decimal string.
#[derive(Debug, Deserialize)]
struct TickerPrice {
    symbol: String,
    price: String,
}

/// Binance spot ticker client.
pub struct BinanceClient {
    http: Client,
    base_url: String,
}

impl BinanceClient {
    /// Create a client against the given base URL (no trailing slash needed).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent("tradebot/0.1.0")
            .build()
            .context("Failed to build HTTP client for Binance")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(cfg: &FeedConfig) -> Result<Self> {
        Self::new(&cfg.base_url, Duration::from_secs(cfg.timeout_secs))
    }

    fn ticker_url(&self, symbol: &str) -> String {
        format!(
            "{}/api/v3/ticker/price?symbol={}",
            self.base_url,
            urlencoding::encode(symbol)
        )
    }
}

/// Parse a ticker body into a usable price.
fn parse_ticker(symbol: &str, body: &str) -> Result<f64, FeedError> {
    let ticker: TickerPrice = serde_json::from_str(body)
        .map_err(|e| FeedError::network(symbol, format!("malformed ticker response: {e}")))?;

    let price: f64 = ticker.price.trim().parse().map_err(|_| {
        FeedError::network(symbol, format!("unparseable price {:?}", ticker.price))
    })?;

    if !price.is_finite() || price <= 0.0 {
        return Err(FeedError::network(
            symbol,
            format!("invalid price {price} for {}", ticker.symbol),
        ));
    }

    Ok(price)
}

#[async_trait]
impl PriceFeed for BinanceClient {
    async fn fetch_price(&self, symbol: &str) -> Result<f64, FeedError> {
        let url = self.ticker_url(symbol);
        debug!(url = %url, "Fetching Binance ticker");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| FeedError::network(symbol, e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FeedError::network(symbol, format!("HTTP {status}: {body}")));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| FeedError::network(symbol, e))?;

        parse_ticker(symbol, &body)
    }

    fn name(&self) -> &'static str {
        FEED_NAME
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
