//! Metrics registry for aerosearch
//!
//! - Counters only, monotonic
//! - Reset only on process start
//! - Passive: reading or updating a counter never changes query results

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters for the search and join paths.
///
/// Uses Relaxed ordering; counters are independent of each other.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Successful search requests
    queries_executed: AtomicU64,
    /// Search requests that failed
    queries_rejected: AtomicU64,
    /// Joins that produced a result
    joins_executed: AtomicU64,
    /// Joins that failed
    joins_failed: AtomicU64,
    /// Inverted value indexes built
    index_builds: AtomicU64,
    /// Inverted value indexes served from cache
    index_cache_hits: AtomicU64,
    /// Cache lookups that had to build
    index_cache_misses: AtomicU64,
    /// Distinct from-values probed against to-side indexes
    values_probed: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_queries_executed(&self) {
        self.queries_executed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_queries_rejected(&self) {
        self.queries_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_joins_executed(&self) {
        self.joins_executed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_joins_failed(&self) {
        self.joins_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_index_builds(&self) {
        self.index_builds.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_index_cache_hits(&self) {
        self.index_cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_index_cache_misses(&self) {
        self.index_cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Add to the probed-values counter
    pub fn add_values_probed(&self, count: u64) {
        self.values_probed.fetch_add(count, Ordering::Relaxed);
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            queries_executed: self.queries_executed.load(Ordering::Relaxed),
            queries_rejected: self.queries_rejected.load(Ordering::Relaxed),
            joins_executed: self.joins_executed.load(Ordering::Relaxed),
            joins_failed: self.joins_failed.load(Ordering::Relaxed),
            index_builds: self.index_builds.load(Ordering::Relaxed),
            index_cache_hits: self.index_cache_hits.load(Ordering::Relaxed),
            index_cache_misses: self.index_cache_misses.load(Ordering::Relaxed),
            values_probed: self.values_probed.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time copy of all counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub queries_executed: u64,
    pub queries_rejected: u64,
    pub joins_executed: u64,
    pub joins_failed: u64,
    pub index_builds: u64,
    pub index_cache_hits: u64,
    pub index_cache_misses: u64,
    pub values_probed: u64,
}
