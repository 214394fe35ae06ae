//! Bot controller: the control plane request handlers call.
//!
//! Owns the status store, the bot log, the price feed and the handle of
//! the current worker task. Handlers never talk to the worker directly;
//! `stop` only flips the running flag and the worker notices on its next
//! iteration.

use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::logger::BotLogger;
use super::status::StatusStore;
use super::worker::{TradingWorker, WorkerSettings};
use crate::feed::PriceFeed;
use crate::types::{BotStatus, ControlError, StartAccepted, StopAccepted};

pub struct BotController {
    store: Arc<StatusStore>,
    log: Arc<BotLogger>,
    feed: Arc<dyn PriceFeed>,
    settings: WorkerSettings,
    /// Session number and task of the newest worker.
    worker: Mutex<Option<(u64, JoinHandle<()>)>>,
}

impl BotController {
    pub fn new(
        initial: BotStatus,
        log: Arc<BotLogger>,
        feed: Arc<dyn PriceFeed>,
        settings: WorkerSettings,
    ) -> Self {
        Self {
            store: Arc::new(StatusStore::new(initial)),
            log,
            feed,
            settings,
            worker: Mutex::new(None),
        }
    }

    /// Start a session with the given profit target and spawn its worker.
    ///
    /// The target is not validated; a non-positive value makes any price
    /// at or above the buy price (or below it) an immediate sell.
    /// Must be called from within a tokio runtime.
    pub fn start(&self, profit_target_percent: f64) -> Result<StartAccepted, ControlError> {
        let session = self
            .store
            .begin_session(|s| {
                s.profit_target_percent = profit_target_percent;
                s.buy_price = None;
            })
            .ok_or(ControlError::AlreadyRunning)?;

        let worker = TradingWorker::new(
            session,
            Arc::clone(&self.store),
            Arc::clone(&self.log),
            Arc::clone(&self.feed),
            self.settings,
        );
        self.install_worker(session, tokio::spawn(worker.run()));

        info!(session, profit_target_percent, "Bot started");
        self.log
            .append(format!("Bot started, profit target: {profit_target_percent}%"));

        Ok(StartAccepted {
            profit_target_percent,
        })
    }

    /// Keep the handle of the newest session. A handle from an older
    /// session is detached; its worker halts on its next iteration.
    fn install_worker(&self, session: u64, handle: JoinHandle<()>) {
        let mut slot = self.worker.lock().unwrap_or_else(PoisonError::into_inner);
        let newer = slot.as_ref().map(|(s, _)| *s).filter(|s| *s > session);
        if let Some(newer) = newer {
            debug!(session, newer, "Detaching worker of superseded session");
            return;
        }
        let previous = slot.replace((session, handle));
        if previous.is_some_and(|(_, h)| !h.is_finished()) {
            warn!(session, "Previous worker still winding down");
        }
    }

    /// Ask the worker to stop. Returns immediately.
    pub fn stop(&self) -> Result<StopAccepted, ControlError> {
        if !self.store.try_set_running(false, true) {
            return Err(ControlError::NotRunning);
        }
        info!("Bot stopping");
        self.log.append("Stopping bot...");
        Ok(StopAccepted)
    }

    pub fn status(&self) -> BotStatus {
        self.store.get()
    }

    pub fn logs(&self) -> Vec<String> {
        self.log.snapshot()
    }

    pub fn is_running(&self) -> bool {
        self.store.get().running
    }

    /// Wait for the current worker task (if any) to finish. Does not stop it.
    pub async fn join(&self) {
        let handle = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some((_, handle)) = handle {
            if let Err(e) = handle.await {
                warn!(error = %e, "Worker task ended abnormally");
            }
        }
    }

    /// Stop the bot if it is running and wait for the worker to exit.
    /// Used on process shutdown.
    pub async fn shutdown(&self) {
        if self.stop().is_ok() {
            info!("Waiting for worker to exit");
        }
        self.join().await;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
