//! Dashboard: Axum web server exposing the bot's control API.
//!
//! JSON only; the browser page that drives it is served elsewhere.
//! CORS is open so a locally served page can call it.

pub mod routes;

use anyhow::{Context, Result};
use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use routes::AppState;

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/start", post(routes::start_bot))
        .route("/api/stop", post(routes::stop_bot))
        .route("/api/status", get(routes::get_status))
        .route("/api/logs", get(routes::get_logs))
        .route("/health", get(routes::health))
        .layer(cors)
        .with_state(state)
}

/// Serve the control API until `shutdown` resolves.
pub async fn serve<F>(state: AppState, host: &str, port: u16, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("Invalid dashboard address {host}:{port}"))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind dashboard on {addr}"))?;

    info!(%addr, "Dashboard listening on http://{addr}");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("Dashboard server error")?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
