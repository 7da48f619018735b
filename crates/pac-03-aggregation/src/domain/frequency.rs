//! Frequency of composite distances.

use pac_01_prime_universe::PrimeUniverse;
use pac_02_anchor_search::{AnchorSink, EngineError, Evaluation, Mergeable};
use serde::{Deserialize, Serialize};

use super::bucket::{percent, TallyBucket};

/// Counts Law I failures by raw `k_min`.
#[derive(Clone, Debug, Default)]
pub struct FrequencyTally {
    counts: TallyBucket<u64>,
    failures: u64,
}

impl FrequencyTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failures(&self) -> u64 {
        self.failures
    }

    pub fn counts(&self) -> &TallyBucket<u64> {
        &self.counts
    }

    /// Ranked table of the `top_n` most frequent distances.
    pub fn report(&self, top_n: usize) -> FrequencyReport {
        let (top, rest) = self.counts.top_with_remainder(top_n);
        FrequencyReport {
            total_failures: self.failures,
            distinct_distances: self.counts.len(),
            rows: top
                .into_iter()
                .map(|(k, tally)| FrequencyRow {
                    k,
                    count: tally.count,
                    percent: percent(tally.count, self.failures),
                })
                .collect(),
            other: rest.map(|tally| OtherRow {
                count: tally.count,
                percent: percent(tally.count, self.failures),
            }),
        }
    }
}

impl AnchorSink for FrequencyTally {
    fn observe(
        &mut self,
        evaluation: &Evaluation,
        _universe: &PrimeUniverse,
    ) -> Result<(), EngineError> {
        if evaluation.verdict.is_composite_failure {
            self.failures += 1;
            self.counts.increment(evaluation.outcome.k_min);
        }
        Ok(())
    }
}

impl Mergeable for FrequencyTally {
    fn merge(&mut self, other: Self) {
        self.failures += other.failures;
        self.counts.merge(other.counts);
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrequencyReport {
    pub total_failures: u64,
    pub distinct_distances: usize,
    pub rows: Vec<FrequencyRow>,
    /// Everything outside the top rows
    pub other: Option<OtherRow>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrequencyRow {
    pub k: u64,
    pub count: u64,
    pub percent: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OtherRow {
    pub count: u64,
    pub percent: f64,
}
