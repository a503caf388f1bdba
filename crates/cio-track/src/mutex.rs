//! Async mutual exclusion for the request pipeline
//!
//! [`AsyncMutex`] hands out at most one [`ScopedLock`] at a time. Waiting
//! suspends the calling task, never the worker thread, and a free permit is
//! taken without yielding to the scheduler.
//!
//! Release is tied to the lifetime of the handle: it happens when the handle
//! is dropped or passed to [`ScopedLock::release`], so every exit path of the
//! guarded code (early return, `?`, panic, cancellation of the owning future)
//! gives the permit back. Because `release` consumes the handle, releasing
//! twice for one acquisition cannot be expressed.
//!
//! Waiter order is not part of the contract. The lock is not reentrant: a task
//! that already holds it and calls [`AsyncMutex::acquire`] again waits forever.

use std::fmt;
use tokio::sync::{Mutex, MutexGuard};

/// Binary async permit guarding network access
#[derive(Default)]
pub struct AsyncMutex {
    permit: Mutex<()>,
}

impl AsyncMutex {
    pub fn new() -> Self {
        Self {
            permit: Mutex::new(()),
        }
    }

    /// Wait until the permit is free and take it
    pub async fn acquire(&self) -> ScopedLock<'_> {
        ScopedLock {
            _guard: self.permit.lock().await,
        }
    }

    /// Take the permit only if nobody holds it
    pub fn try_acquire(&self) -> Option<ScopedLock<'_>> {
        self.permit
            .try_lock()
            .ok()
            .map(|guard| ScopedLock { _guard: guard })
    }

    /// Diagnostic snapshot of whether some task holds the permit
    ///
    /// Probing briefly takes a free permit, so a concurrent
    /// [`try_acquire`](Self::try_acquire) may fail during the check. Never
    /// use this to decide whether to acquire.
    pub fn is_locked(&self) -> bool {
        self.permit.try_lock().is_err()
    }
}

impl fmt::Debug for AsyncMutex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncMutex").finish_non_exhaustive()
    }
}

/// Proof of holding the [`AsyncMutex`] permit
#[must_use = "the lock is released as soon as the handle is dropped"]
pub struct ScopedLock<'a> {
    _guard: MutexGuard<'a, ()>,
}

impl ScopedLock<'_> {
    /// Give the permit back, letting one waiter proceed
    pub fn release(self) {
        drop(self);
    }
}

impl fmt::Debug for ScopedLock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ScopedLock")
    }
}
