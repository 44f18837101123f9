//! Cache statistics

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Counters kept by every cache implementation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStatistics {
    /// Lookups that found a value
    pub hits: u64,
    /// Lookups that found nothing (including unreadable storage)
    pub misses: u64,
    /// Successful stores
    pub writes: u64,
    /// Stores that failed
    pub write_failures: u64,
}

impl CacheStatistics {
    /// Calculate hit rate
    pub fn hit_rate(&self) -> f64 {
        let total_requests = self.hits + self.misses;
        if total_requests == 0 {
            0.0
        } else {
            self.hits as f64 / total_requests as f64
        }
    }
}

impl std::fmt::Display for CacheStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "hits={} misses={} writes={} write_failures={} hit_rate={:.1}%",
            self.hits,
            self.misses,
            self.writes,
            self.write_failures,
            self.hit_rate() * 100.0
        )
    }
}

/// Shared, lock-protected statistics
#[derive(Debug, Default)]
pub(crate) struct StatsRecorder {
    inner: Mutex<CacheStatistics>,
}

impl StatsRecorder {
    pub(crate) fn record_lookup(&self, hit: bool) {
        let mut stats = self.inner.lock();
        if hit {
            stats.hits += 1;
        } else {
            stats.misses += 1;
        }
    }

    pub(crate) fn record_store(&self, ok: bool) {
        let mut stats = self.inner.lock();
        if ok {
            stats.writes += 1;
        } else {
            stats.write_failures += 1;
        }
    }

    pub(crate) fn snapshot(&self) -> CacheStatistics {
        self.inner.lock().clone()
    }
}
