//! Request statistics.
//!
//! The collector is a passive observer: the executor and the gate call its
//! `record_*` hooks at transition points, any caller may snapshot at any
//! time, and no read ever blocks a writer — everything is a relaxed
//! atomic.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

#[cfg(feature = "metrics")]
use crate::metrics::{
    ACTIVE_REQUESTS_GAUGE, CACHE_HIT_COUNTER, QUEUED_REQUESTS_GAUGE, REQUESTS_FAILED_COUNTER,
    REQUESTS_SUCCESS_COUNTER, REQUESTS_TOTAL_COUNTER, RETRIES_COUNTER,
};

/// Point-in-time snapshot of the collector plus the component gauges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Logical requests settled (success + failed).
    pub total: u64,
    /// Requests settled successfully.
    pub success: u64,
    /// Requests settled with an error.
    pub failed: u64,
    /// Requests served straight from cache.
    pub cached: u64,
    /// Retries performed across all requests.
    pub retried: u64,
    /// Entries currently in the cache.
    pub cache_size: usize,
    /// Requests currently in flight in the pending table.
    pub pending_requests: usize,
    /// Requests currently executing inside the concurrency gate.
    pub active_requests: usize,
    /// Requests currently waiting for admission.
    pub queue_length: usize,
}

/// Counter and gauge state mutated at request transition points.
#[derive(Debug, Default)]
pub struct StatsCollector {
    total: AtomicU64,
    success: AtomicU64,
    failed: AtomicU64,
    cached: AtomicU64,
    retried: AtomicU64,
    active: AtomicUsize,
    queued: AtomicUsize,
}

impl StatsCollector {
    /// Creates a zeroed collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the settlement of one logical request.
    pub fn record_settlement(&self, success: bool) {
        self.total.fetch_add(1, Ordering::Relaxed);
        if success {
            self.success.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
        #[cfg(feature = "metrics")]
        {
            metrics::counter!(*REQUESTS_TOTAL_COUNTER).increment(1);
            if success {
                metrics::counter!(*REQUESTS_SUCCESS_COUNTER).increment(1);
            } else {
                metrics::counter!(*REQUESTS_FAILED_COUNTER).increment(1);
            }
        }
    }

    /// Records a response served from cache.
    pub fn record_cache_hit(&self) {
        self.cached.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "metrics")]
        metrics::counter!(*CACHE_HIT_COUNTER).increment(1);
    }

    /// Records one retry.
    pub fn record_retry(&self) {
        self.retried.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "metrics")]
        metrics::counter!(*RETRIES_COUNTER).increment(1);
    }

    /// Records a request entering active execution.
    pub fn record_admitted(&self) {
        self.active.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "metrics")]
        metrics::gauge!(*ACTIVE_REQUESTS_GAUGE).increment(1.0);
    }

    /// Records a request leaving active execution.
    pub fn record_released(&self) {
        self.active.fetch_sub(1, Ordering::Relaxed);
        #[cfg(feature = "metrics")]
        metrics::gauge!(*ACTIVE_REQUESTS_GAUGE).decrement(1.0);
    }

    /// Records a request entering the admission queue.
    pub fn record_enqueued(&self) {
        self.queued.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "metrics")]
        metrics::gauge!(*QUEUED_REQUESTS_GAUGE).increment(1.0);
    }

    /// Records a request leaving the admission queue (admitted or timed
    /// out).
    pub fn record_dequeued(&self) {
        self.queued.fetch_sub(1, Ordering::Relaxed);
        #[cfg(feature = "metrics")]
        metrics::gauge!(*QUEUED_REQUESTS_GAUGE).decrement(1.0);
    }

    /// Current number of actively executing requests.
    pub fn active(&self) -> usize {
        self.active.load(Ordering::Relaxed)
    }

    /// Current number of queued requests.
    pub fn queued(&self) -> usize {
        self.queued.load(Ordering::Relaxed)
    }

    /// Snapshots the counters, filling component-owned gauges from the
    /// caller.
    pub fn snapshot(&self, cache_size: usize, pending_requests: usize) -> Stats {
        Stats {
            total: self.total.load(Ordering::Relaxed),
            success: self.success.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            cached: self.cached.load(Ordering::Relaxed),
            retried: self.retried.load(Ordering::Relaxed),
            cache_size,
            pending_requests,
            active_requests: self.active.load(Ordering::Relaxed),
            queue_length: self.queued.load(Ordering::Relaxed),
        }
    }
}
