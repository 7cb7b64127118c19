//! Transaction queue metrics.
//!
//! The queue reports how long transactions have been pending through a
//! set of per-age gauges. The sink is injected at queue construction and
//! may be read concurrently by an exporter; all values are atomics.

use std::sync::atomic::{AtomicI64, Ordering};

/// Atomic counter for simple metrics.
#[derive(Debug, Default)]
pub struct Counter {
    value: AtomicI64,
}

impl Counter {
    /// Create a new counter starting at 0.
    pub fn new() -> Self {
        Self {
            value: AtomicI64::new(0),
        }
    }

    /// Increment the counter by 1.
    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    /// Decrement the counter by 1.
    pub fn dec(&self) {
        self.value.fetch_sub(1, Ordering::Relaxed);
    }

    /// Increment the counter by n.
    pub fn add(&self, n: i64) {
        self.value.fetch_add(n, Ordering::Relaxed);
    }

    /// Decrement the counter by n.
    pub fn sub(&self, n: i64) {
        self.value.fetch_sub(n, Ordering::Relaxed);
    }

    /// Set the counter to a specific value.
    pub fn set(&self, n: i64) {
        self.value.store(n, Ordering::Relaxed);
    }

    /// Get the current value.
    pub fn get(&self) -> i64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// Gauges describing the pending transaction queue.
///
/// `pending_by_age(i)` counts transactions whose source account has gone
/// `i` ledgers without one of its transactions being applied.
#[derive(Debug)]
pub struct TxQueueMetrics {
    pending_by_age: Vec<Counter>,
}

impl TxQueueMetrics {
    /// Create a sink with one gauge per age bucket.
    pub fn new(pending_depth: u32) -> Self {
        Self {
            pending_by_age: (0..pending_depth).map(|_| Counter::new()).collect(),
        }
    }

    /// Number of age buckets.
    pub fn depth(&self) -> usize {
        self.pending_by_age.len()
    }

    /// The gauge for one age bucket.
    pub fn pending_by_age(&self, age: u32) -> &Counter {
        &self.pending_by_age[age as usize]
    }
}
