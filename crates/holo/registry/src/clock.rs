//! Time source for record timestamps
//!
//! A timestamp of 0 means "unset" on simulation records, so every clock
//! must report a strictly positive time.

use std::sync::atomic::{AtomicI64, Ordering};
use thiserror::Error;

/// Supplies the current time in milliseconds since the Unix epoch
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

/// Wall clock backed by `chrono::Utc`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Manual clock errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClockError {
    #[error("clock time must be at least 1, got {0}")]
    NonPositiveTime(i64),

    #[error("clock can only move forward, got delta {0}")]
    NonPositiveDelta(i64),

    #[error("advancing clock at {now} by {delta} overflows")]
    Overflow { now: i64, delta: i64 },
}

/// Manually driven clock for tests and deterministic replay
#[derive(Debug)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(start_millis: i64) -> Result<Self, ClockError> {
        if start_millis < 1 {
            return Err(ClockError::NonPositiveTime(start_millis));
        }
        Ok(Self {
            now: AtomicI64::new(start_millis),
        })
    }

    pub fn set(&self, millis: i64) -> Result<(), ClockError> {
        if millis < 1 {
            return Err(ClockError::NonPositiveTime(millis));
        }
        self.now.store(millis, Ordering::SeqCst);
        Ok(())
    }

    /// Advance by `delta_millis` and return the new time
    pub fn advance(&self, delta_millis: i64) -> Result<i64, ClockError> {
        if delta_millis < 1 {
            return Err(ClockError::NonPositiveDelta(delta_millis));
        }
        self.now
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |now| {
                now.checked_add(delta_millis)
            })
            .map(|previous| previous + delta_millis)
            .map_err(|now| ClockError::Overflow {
                now,
                delta: delta_millis,
            })
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self {
            now: AtomicI64::new(1),
        }
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}
