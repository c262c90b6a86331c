//! Monitor status cache
//!
//! Holds the result of the most recent upstream refresh together with the
//! instant it was taken. The clock is injected so TTL behaviour is testable
//! without sleeping.

use crate::devices::MonitorStatus;
use std::collections::HashSet;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Source of the current instant
pub trait Clock: Send + Sync {
    /// Returns the current instant
    fn now(&self) -> Instant;
}

/// Clock backed by the real monotonic time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to
///
/// Intended for tests.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    /// Start at the current real instant
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    statuses: Vec<MonitorStatus>,
    fetched_at: Instant,
}

/// Single-entry cache of the last refresh
#[derive(Debug, Clone)]
pub struct StatusCache {
    ttl: Duration,
    entry: Option<CacheEntry>,
}

impl StatusCache {
    /// Create an empty cache with the given time-to-live
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entry: None }
    }

    /// Time-to-live of a refresh
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Serve `ids` from the cache
    ///
    /// Hits only when the entry is younger than the TTL and holds exactly the
    /// requested id set. Results follow the order of `ids`.
    pub fn lookup(&self, ids: &[String], now: Instant) -> Option<Vec<MonitorStatus>> {
        let entry = self.entry.as_ref()?;

        let age = now.saturating_duration_since(entry.fetched_at);
        if age >= self.ttl {
            return None;
        }

        let requested: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let cached: HashSet<&str> = entry
            .statuses
            .iter()
            .map(|s| s.monitor_id.as_str())
            .collect();
        if requested != cached {
            return None;
        }

        ids.iter()
            .map(|id| entry.statuses.iter().find(|s| &s.monitor_id == id).cloned())
            .collect()
    }

    /// Replace the whole cache with a fresh result
    pub fn replace(&mut self, statuses: Vec<MonitorStatus>, now: Instant) {
        self.entry = Some(CacheEntry {
            statuses,
            fetched_at: now,
        });
    }
}
