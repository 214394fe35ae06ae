//! tradebot: simulated price-target trading bot.
//!
//! Entry point. Loads configuration, initialises structured logging,
//! wires the Binance ticker into the bot controller and serves the
//! control API until Ctrl+C, then stops the worker and waits for it.

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use tradebot::config::AppConfig;
use tradebot::dashboard::{self, routes::DashboardState};
use tradebot::engine::controller::BotController;
use tradebot::engine::logger::BotLogger;
use tradebot::feed::binance::BinanceClient;
use tradebot::types::BotStatus;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let config_path =
        std::env::var("TRADEBOT_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let cfg = AppConfig::load(&config_path)?;

    init_logging();

    info!(
        symbol = %cfg.bot.symbol,
        poll_interval_secs = cfg.bot.poll_interval_secs,
        feed = %cfg.feed.base_url,
        "tradebot starting up (simulation only, no real orders)"
    );

    let feed = BinanceClient::from_config(&cfg.feed)?;
    let controller = BotController::new(
        BotStatus::new(cfg.bot.symbol.clone(), cfg.bot.default_profit_percentage),
        Arc::new(BotLogger::new(cfg.bot.log_capacity)),
        Arc::new(feed),
        cfg.bot.worker_settings(),
    );
    let state = Arc::new(DashboardState::new(
        controller,
        cfg.bot.default_profit_percentage,
    ));

    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
        info!("Shutdown signal received.");
    };

    dashboard::serve(
        Arc::clone(&state),
        &cfg.dashboard.host,
        cfg.dashboard.port,
        shutdown,
    )
    .await?;

    state.controller.shutdown().await;
    info!("tradebot shut down cleanly.");

    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tradebot=info"));

    if std::env::var("TRADEBOT_LOG_JSON").is_ok() {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt().with_env_filter(env_filter).with_target(true).init();
    }
}
