//! Control API route handlers.
//!
//! All endpoints return JSON. State is shared via `Arc<DashboardState>`.
//! Handlers only call the controller; they never touch the worker.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::engine::controller::BotController;
use crate::types::{BotStatus, ControlError};

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Shared state accessible by all route handlers.
pub struct DashboardState {
    pub controller: BotController,
    /// Used when a start request omits `profit_percentage`.
    pub default_profit_percentage: f64,
}

impl DashboardState {
    pub fn new(controller: BotController, default_profit_percentage: f64) -> Self {
        Self {
            controller,
            default_profit_percentage,
        }
    }
}

pub type AppState = Arc<DashboardState>;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StartRequest {
    #[serde(default)]
    pub profit_percentage: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsResponse {
    pub logs: Vec<String>,
}

type Rejection = (StatusCode, Json<MessageResponse>);

fn message(text: impl Into<String>) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: text.into(),
    })
}

fn reject(err: ControlError) -> Rejection {
    (StatusCode::BAD_REQUEST, message(err.to_string()))
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// POST /api/start
pub async fn start_bot(
    State(state): State<AppState>,
    Json(req): Json<StartRequest>,
) -> Result<Json<MessageResponse>, Rejection> {
    let target = req
        .profit_percentage
        .unwrap_or(state.default_profit_percentage);

    // The controller accepts any target; this is the caller-side check.
    if !target.is_finite() || target <= 0.0 {
        debug!(profit_percentage = target, "Rejected start: invalid profit percentage");
        return Err((
            StatusCode::BAD_REQUEST,
            message("profit_percentage must be a number greater than 0"),
        ));
    }

    let accepted = state.controller.start(target).map_err(reject)?;
    Ok(message(accepted.message()))
}

/// POST /api/stop
pub async fn stop_bot(State(state): State<AppState>) -> Result<Json<MessageResponse>, Rejection> {
    let accepted = state.controller.stop().map_err(reject)?;
    Ok(message(accepted.message()))
}

/// GET /api/status
pub async fn get_status(State(state): State<AppState>) -> Json<BotStatus> {
    Json(state.controller.status())
}

/// GET /api/logs
pub async fn get_logs(State(state): State<AppState>) -> Json<LogsResponse> {
    Json(LogsResponse {
        logs: state.controller.logs(),
    })
}

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
