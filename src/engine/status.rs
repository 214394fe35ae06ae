//! Status store: the single source of truth for bot state.
//!
//! Every operation holds the lock only for an in-memory copy or field
//! update; nothing here awaits or does I/O.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::types::BotStatus;

struct Inner {
    status: BotStatus,
    /// Bumped each time `running` goes from false to true.
    session: u64,
}

/// Lock-guarded `BotStatus` shared by the controller and the worker.
pub struct StatusStore {
    inner: Mutex<Inner>,
}

impl StatusStore {
    pub fn new(initial: BotStatus) -> Self {
        Self {
            inner: Mutex::new(Inner {
                status: initial,
                session: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Critical sections can't leave the status half-written, so a
        // poisoned lock still holds a consistent value.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the current status.
    pub fn get(&self) -> BotStatus {
        self.lock().status.clone()
    }

    /// Snapshot together with the current session number.
    pub fn session_snapshot(&self) -> (BotStatus, u64) {
        let inner = self.lock();
        (inner.status.clone(), inner.session)
    }

    /// Set `running` to `target` only if it currently equals
    /// `only_if_current`. Returns whether the transition happened.
    pub fn try_set_running(&self, target: bool, only_if_current: bool) -> bool {
        let mut inner = self.lock();
        if inner.status.running != only_if_current {
            return false;
        }
        inner.status.running = target;
        if target && !only_if_current {
            inner.session += 1;
        }
        true
    }

    /// Claim a new session: flip `running` from false to true, bump the
    /// session and apply `f`, all under one lock. Returns the new session
    /// number, or `None` if the bot was already running.
    pub fn begin_session<F>(&self, f: F) -> Option<u64>
    where
        F: FnOnce(&mut BotStatus),
    {
        let mut inner = self.lock();
        if inner.status.running {
            return None;
        }
        inner.status.running = true;
        inner.session += 1;
        f(&mut inner.status);
        Some(inner.session)
    }

    /// Apply `f` to the live status.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut BotStatus),
    {
        f(&mut self.lock().status);
    }

    /// Apply `f` only while `session` is still the current session.
    /// Returns false (and leaves the status untouched) otherwise.
    pub fn update_session<F>(&self, session: u64, f: F) -> bool
    where
        F: FnOnce(&mut BotStatus),
    {
        let mut inner = self.lock();
        if inner.session != session {
            return false;
        }
        f(&mut inner.status);
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
