//! Scan diagnostics
//!
//! Thread-safe counters shared by sequential and partitioned scans. The
//! skipped count is kept separate so cap exhaustion is never confused with
//! either Law I outcome.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::domain::Evaluation;

/// Running counters for one scan.
#[derive(Debug, Default)]
pub struct ScanMetrics {
    /// Anchors evaluated
    pub anchors_processed: AtomicU64,
    /// Anchors whose search cap was exhausted
    pub anchors_skipped: AtomicU64,
    /// Law I successes (k = 1 or prime)
    pub successes: AtomicU64,
    /// Law I failures (composite k)
    pub composite_failures: AtomicU64,
    /// Sum of k_min over found outcomes
    pub distance_sum: AtomicU64,
}

impl ScanMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one evaluation.
    pub fn record(&self, evaluation: &Evaluation) {
        self.anchors_processed.fetch_add(1, Ordering::Relaxed);
        if evaluation.verdict.is_success {
            self.successes.fetch_add(1, Ordering::Relaxed);
        } else if evaluation.verdict.is_composite_failure {
            self.composite_failures.fetch_add(1, Ordering::Relaxed);
        } else {
            self.anchors_skipped.fetch_add(1, Ordering::Relaxed);
        }
        if evaluation.outcome.found {
            self.distance_sum
                .fetch_add(evaluation.outcome.k_min, Ordering::Relaxed);
        }
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> ScanSnapshot {
        ScanSnapshot {
            anchors_processed: self.anchors_processed.load(Ordering::Relaxed),
            anchors_skipped: self.anchors_skipped.load(Ordering::Relaxed),
            successes: self.successes.load(Ordering::Relaxed),
            composite_failures: self.composite_failures.load(Ordering::Relaxed),
            distance_sum: self.distance_sum.load(Ordering::Relaxed),
        }
    }

    /// Add counters gathered elsewhere, returning the new totals.
    ///
    /// Partitioned scans fold each partition's progress in here.
    pub fn add(&self, delta: &ScanSnapshot) -> ScanSnapshot {
        ScanSnapshot {
            anchors_processed: self
                .anchors_processed
                .fetch_add(delta.anchors_processed, Ordering::Relaxed)
                + delta.anchors_processed,
            anchors_skipped: self
                .anchors_skipped
                .fetch_add(delta.anchors_skipped, Ordering::Relaxed)
                + delta.anchors_skipped,
            successes: self.successes.fetch_add(delta.successes, Ordering::Relaxed)
                + delta.successes,
            composite_failures: self
                .composite_failures
                .fetch_add(delta.composite_failures, Ordering::Relaxed)
                + delta.composite_failures,
            distance_sum: self
                .distance_sum
                .fetch_add(delta.distance_sum, Ordering::Relaxed)
                + delta.distance_sum,
        }
    }
}

/// Point-in-time scan counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSnapshot {
    pub anchors_processed: u64,
    pub anchors_skipped: u64,
    pub successes: u64,
    pub composite_failures: u64,
    pub distance_sum: u64,
}

impl ScanSnapshot {
    /// Add another partition's counters.
    pub fn absorb(&mut self, other: &ScanSnapshot) {
        self.anchors_processed += other.anchors_processed;
        self.anchors_skipped += other.anchors_skipped;
        self.successes += other.successes;
        self.composite_failures += other.composite_failures;
        self.distance_sum += other.distance_sum;
    }

    /// Counters gained since `earlier`, a previous snapshot of the same scan.
    pub fn since(&self, earlier: &ScanSnapshot) -> ScanSnapshot {
        ScanSnapshot {
            anchors_processed: self.anchors_processed.saturating_sub(earlier.anchors_processed),
            anchors_skipped: self.anchors_skipped.saturating_sub(earlier.anchors_skipped),
            successes: self.successes.saturating_sub(earlier.successes),
            composite_failures: self
                .composite_failures
                .saturating_sub(earlier.composite_failures),
            distance_sum: self.distance_sum.saturating_sub(earlier.distance_sum),
        }
    }

    /// Anchors with a conclusive search.
    pub fn anchors_found(&self) -> u64 {
        self.successes + self.composite_failures
    }

    /// Composite failures as a share of conclusive anchors, in percent.
    pub fn failure_rate_percent(&self) -> f64 {
        let found = self.anchors_found();
        if found > 0 {
            self.composite_failures as f64 / found as f64 * 100.0
        } else {
            0.0
        }
    }

    /// Mean nearest-prime distance over conclusive anchors.
    pub fn mean_distance(&self) -> f64 {
        let found = self.anchors_found();
        if found > 0 {
            self.distance_sum as f64 / found as f64
        } else {
            0.0
        }
    }
}
