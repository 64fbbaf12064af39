//! [`Clock`] implementations.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::traits::Clock;
use crate::types::{DurationSecs, Timestamp};

/// Wall-clock time from the system.
///
/// Times before the Unix epoch are clamped to [`Timestamp::EPOCH`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Timestamp(secs)
    }
}

/// A settable clock for tests and simulations.
#[derive(Debug, Default)]
pub struct ManualClock {
    secs: AtomicU64,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            secs: AtomicU64::new(start.0),
        }
    }

    pub fn set(&self, t: Timestamp) {
        self.secs.store(t.0, Ordering::SeqCst);
    }

    /// Move forward by `secs`, saturating at `u64::MAX`.
    pub fn advance(&self, secs: DurationSecs) {
        let _ = self
            .secs
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |cur| {
                Some(cur.saturating_add(secs))
            });
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp(self.secs.load(Ordering::SeqCst))
    }
}
