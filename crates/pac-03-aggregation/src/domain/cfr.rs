//! Composite failure rate of primorial-grid anchors.
//!
//! For every prime q > 7 and each filter, the nearest multiple of the
//! modulus is classified by its distance to q. The decay hypothesis holds
//! when the failure rate strictly falls as the filter grows.

use pac_02_anchor_search::{EngineError, GridEvaluation, GridSink, Mergeable, Primorial};
use serde::{Deserialize, Serialize};

use super::bucket::{percent, TallyBucket};

#[derive(Clone, Debug)]
pub struct CfrTally {
    filters: Vec<Primorial>,
    failures: TallyBucket<Primorial>,
    tested: u64,
}

impl Default for CfrTally {
    fn default() -> Self {
        Self::new(Primorial::GRID.to_vec())
    }
}

impl CfrTally {
    /// `filters` in ascending strength.
    pub fn new(filters: Vec<Primorial>) -> Self {
        Self {
            filters,
            failures: TallyBucket::new(),
            tested: 0,
        }
    }

    pub fn filters(&self) -> &[Primorial] {
        &self.filters
    }

    pub fn tested(&self) -> u64 {
        self.tested
    }

    pub fn failures(&self, filter: Primorial) -> u64 {
        self.failures.count(&filter)
    }

    pub fn report(&self) -> CfrReport {
        let rows: Vec<CfrRow> = self
            .filters
            .iter()
            .map(|&filter| {
                let failures = self.failures(filter);
                CfrRow {
                    filter,
                    modulus: filter.modulus(),
                    failures,
                    rate_percent: percent(failures, self.tested),
                }
            })
            .collect();
        let decay_holds = self.tested > 0
            && rows
                .windows(2)
                .all(|pair| pair[1].rate_percent < pair[0].rate_percent);
        CfrReport {
            primes_tested: self.tested,
            rows,
            decay_holds,
        }
    }
}

impl GridSink for CfrTally {
    fn observe_prime(
        &mut self,
        _prime: u64,
        evaluations: &[GridEvaluation],
    ) -> Result<(), EngineError> {
        self.tested += 1;
        for evaluation in evaluations {
            if evaluation.verdict.is_composite_failure {
                self.failures.increment(evaluation.grid.filter);
            }
        }
        Ok(())
    }
}

impl Mergeable for CfrTally {
    fn merge(&mut self, other: Self) {
        self.tested += other.tested;
        self.failures.merge(other.failures);
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CfrReport {
    /// Primes q > 7 evaluated
    pub primes_tested: u64,
    pub rows: Vec<CfrRow>,
    /// CFR strictly decreases along the filter list
    pub decay_holds: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CfrRow {
    pub filter: Primorial,
    pub modulus: u64,
    pub failures: u64,
    pub rate_percent: f64,
}
