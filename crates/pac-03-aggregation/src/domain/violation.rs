//! Primorial filter violations.
//!
//! A perfect anchor (S ≡ 0 mod M) whose composite distance shares an odd
//! prime factor with M is a counterexample to the filter hypothesis. Every
//! such event is kept, in index order.

use pac_01_prime_universe::PrimeUniverse;
use pac_02_anchor_search::{AnchorSink, EngineError, Evaluation, FailureEvent, Mergeable, Primorial};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::bucket::TallyBucket;

#[derive(Clone, Debug)]
struct FilterStats {
    filter: Primorial,
    perfect_anchors: u64,
    failures_by_k: TallyBucket<u64>,
    violations: Vec<FailureEvent>,
}

impl FilterStats {
    fn new(filter: Primorial) -> Self {
        Self {
            filter,
            perfect_anchors: 0,
            failures_by_k: TallyBucket::new(),
            violations: Vec::new(),
        }
    }
}

/// Tracks perfect anchors and their failures for each filter.
#[derive(Clone, Debug)]
pub struct ViolationDetector {
    stats: Vec<FilterStats>,
    total_failures: u64,
}

impl Default for ViolationDetector {
    fn default() -> Self {
        Self::new(&Primorial::ALL)
    }
}

impl ViolationDetector {
    pub fn new(filters: &[Primorial]) -> Self {
        Self {
            stats: filters.iter().map(|&f| FilterStats::new(f)).collect(),
            total_failures: 0,
        }
    }

    pub fn total_failures(&self) -> u64 {
        self.total_failures
    }

    /// Violations recorded for `filter`, in index order.
    pub fn violations(&self, filter: Primorial) -> &[FailureEvent] {
        self.stats
            .iter()
            .find(|s| s.filter == filter)
            .map(|s| s.violations.as_slice())
            .unwrap_or_default()
    }

    pub fn is_falsified(&self) -> bool {
        self.stats.iter().any(|s| !s.violations.is_empty())
    }

    pub fn report(&self) -> ViolationReport {
        let filters = self
            .stats
            .iter()
            .map(|stats| {
                let total = stats.failures_by_k.total();
                FilterReport {
                    filter: stats.filter,
                    modulus: stats.filter.modulus(),
                    forbidden_factors: stats.filter.forbidden_factors().to_vec(),
                    perfect_anchors: stats.perfect_anchors,
                    perfect_failures: total.count,
                    failures_by_k: stats
                        .failures_by_k
                        .iter()
                        .map(|(k, tally)| KCount {
                            k,
                            count: tally.count,
                        })
                        .collect(),
                    violation_count: stats.violations.len(),
                    violations: stats.violations.clone(),
                }
            })
            .collect();
        ViolationReport {
            total_failures: self.total_failures,
            filters,
            falsified: self.is_falsified(),
        }
    }
}

impl AnchorSink for ViolationDetector {
    fn observe(
        &mut self,
        evaluation: &Evaluation,
        _universe: &PrimeUniverse,
    ) -> Result<(), EngineError> {
        let anchor = evaluation.anchor;
        let failure = evaluation.failure();
        if failure.is_some() {
            self.total_failures += 1;
        }

        for stats in &mut self.stats {
            if !anchor.is_perfect(stats.filter) {
                continue;
            }
            stats.perfect_anchors += 1;
            let Some(event) = failure else {
                continue;
            };
            stats.failures_by_k.increment(event.k_min);
            if stats.filter.forbids(event.k_min) {
                warn!(
                    filter = stats.filter.label(),
                    index = event.index,
                    anchor = event.anchor,
                    neighbor_prime = event.neighbor_prime,
                    k = event.k_min,
                    "Primorial filter violation"
                );
                stats.violations.push(event);
            }
        }
        Ok(())
    }
}

impl Mergeable for ViolationDetector {
    fn merge(&mut self, other: Self) {
        self.total_failures += other.total_failures;
        for (mine, theirs) in self.stats.iter_mut().zip(other.stats) {
            mine.perfect_anchors += theirs.perfect_anchors;
            mine.failures_by_k.merge(theirs.failures_by_k);
            mine.violations.extend(theirs.violations);
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViolationReport {
    pub total_failures: u64,
    pub filters: Vec<FilterReport>,
    /// True iff any filter recorded a violation
    pub falsified: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterReport {
    pub filter: Primorial,
    pub modulus: u64,
    pub forbidden_factors: Vec<u64>,
    /// Anchors with S ≡ 0 mod M, skipped ones included
    pub perfect_anchors: u64,
    /// Composite failures among those anchors
    pub perfect_failures: u64,
    /// Ascending by k
    pub failures_by_k: Vec<KCount>,
    pub violation_count: usize,
    pub violations: Vec<FailureEvent>,
}

impl FilterReport {
    pub fn first_violation(&self) -> Option<&FailureEvent> {
        self.violations.first()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KCount {
    pub k: u64,
    pub count: u64,
}
