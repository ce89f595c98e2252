//! Process-wide busy lock for mutating actions.
//!
//! Engaging is exclusive: a second action cannot start while a
//! [`BusyGuard`] is alive. Dropping the guard releases the lock exactly once.

use crate::errors::ActionError;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicU64, Ordering},
};

#[derive(Debug, Default)]
struct BusyState {
    engaged: AtomicBool,
    holder: Mutex<Option<&'static str>>,
    engagements: AtomicU64,
    releases: AtomicU64,
}

#[derive(Debug, Clone, Default)]
pub struct BusyLock {
    state: Arc<BusyState>,
}

impl BusyLock {
    pub fn try_engage(&self, action: &'static str) -> Result<BusyGuard, ActionError> {
        if self
            .state
            .engaged
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            let holder = self.holder().unwrap_or("unknown");
            tracing::warn!(action, holder, "rejected: another action is in flight");
            return Err(ActionError::Busy { holder });
        }

        self.set_holder(Some(action));
        self.state.engagements.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(action, "busy lock engaged");
        Ok(BusyGuard {
            lock: self.clone(),
            action,
        })
    }

    pub fn is_engaged(&self) -> bool {
        self.state.engaged.load(Ordering::Acquire)
    }

    pub fn engagements(&self) -> u64 {
        self.state.engagements.load(Ordering::Relaxed)
    }

    pub fn releases(&self) -> u64 {
        self.state.releases.load(Ordering::Relaxed)
    }

    fn holder(&self) -> Option<&'static str> {
        self.state
            .holder
            .lock()
            .map(|holder| *holder)
            .unwrap_or_default()
    }

    fn set_holder(&self, action: Option<&'static str>) {
        if let Ok(mut holder) = self.state.holder.lock() {
            *holder = action;
        }
    }
}

/// Proof that the busy lock is held.
#[derive(Debug)]
pub struct BusyGuard {
    lock: BusyLock,
    action: &'static str,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.lock.set_holder(None);
        self.lock.state.releases.fetch_add(1, Ordering::Relaxed);
        self.lock.state.engaged.store(false, Ordering::Release);
        tracing::debug!(action = self.action, "busy lock released");
    }
}
