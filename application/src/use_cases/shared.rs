//! Shared utilities for use cases.
//!
//! Contains the lock helper used by the logger and the dispatcher, which share
//! the log queue.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock a mutex, recovering the guard if a previous holder panicked.
///
/// The queue only holds plain data and every critical section leaves it in a
/// consistent state, so a poisoned lock is still safe to use.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
