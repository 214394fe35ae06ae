//! tradebot: simulated price-target trading bot.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod feed;
pub mod engine;
pub mod dashboard;
