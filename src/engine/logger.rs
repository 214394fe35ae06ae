//! Bounded bot log shown to operators.
//!
//! Distinct from `tracing` diagnostics: this is the short history the
//! control API returns. Each line is mirrored to `tracing` as well.

use chrono::Local;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::info;

use crate::types::LogEntry;

/// Default number of lines kept.
pub const DEFAULT_LOG_CAPACITY: usize = 100;

/// Append-only, FIFO-trimmed, thread-safe event log.
pub struct BotLogger {
    entries: Mutex<VecDeque<LogEntry>>,
    capacity: usize,
}

impl Default for BotLogger {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

impl BotLogger {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<LogEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Timestamp `message` and append it, evicting the oldest lines
    /// beyond capacity.
    pub fn append(&self, message: impl Into<String>) {
        let entry = LogEntry {
            timestamp: Local::now(),
            message: message.into(),
        };
        info!(target: "tradebot::bot", "{}", entry.message);

        let mut entries = self.lock();
        entries.push_back(entry);
        while entries.len() > self.capacity {
            entries.pop_front();
        }
    }

    /// Formatted lines, oldest first.
    pub fn snapshot(&self) -> Vec<String> {
        self.lock().iter().map(ToString::to_string).collect()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
