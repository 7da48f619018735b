//! Prime gap g_n = p_{n+1} - p_n correlated with failure type and residue.
//!
//! Both variants keep the overall mean gap over every anchor seen, skipped
//! anchors included, as the baseline for deviation percentages.

use pac_01_prime_universe::PrimeUniverse;
use pac_02_anchor_search::{AnchorSink, EngineError, Evaluation, Mergeable, Primorial};
use serde::{Deserialize, Serialize};

use super::bucket::{Tally, TallyBucket};

/// Deviation of `mean` from `baseline`, in percent.
pub fn deviation_percent(mean: f64, baseline: f64) -> f64 {
    if baseline > 0.0 {
        (mean / baseline - 1.0) * 100.0
    } else {
        0.0
    }
}

/// Gap statistics keyed by composite `k_min`.
#[derive(Clone, Debug, Default)]
pub struct GapByDistance {
    by_k: TallyBucket<u64>,
    overall: Tally,
    failures: u64,
}

impl GapByDistance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn overall(&self) -> Tally {
        self.overall
    }

    pub fn get(&self, k: u64) -> Option<&Tally> {
        self.by_k.get(&k)
    }

    pub fn report(&self, top_n: usize) -> GapReport {
        let baseline = self.overall.mean();
        let (top, rest) = self.by_k.top_with_remainder(top_n);
        GapReport {
            anchors_analyzed: self.overall.count,
            total_failures: self.failures,
            overall_mean_gap: baseline,
            rows: top
                .into_iter()
                .map(|(k, tally)| GapRow::new(k, tally, baseline))
                .collect(),
            other: rest.map(|tally| GapRow::new(0, tally, baseline)),
        }
    }
}

impl AnchorSink for GapByDistance {
    fn observe(
        &mut self,
        evaluation: &Evaluation,
        _universe: &PrimeUniverse,
    ) -> Result<(), EngineError> {
        let gap = evaluation.anchor.gap();
        self.overall.record(gap);
        if evaluation.verdict.is_composite_failure {
            self.failures += 1;
            self.by_k.record(evaluation.outcome.k_min, gap);
        }
        Ok(())
    }
}

impl Mergeable for GapByDistance {
    fn merge(&mut self, other: Self) {
        self.by_k.merge(other.by_k);
        self.overall.absorb(other.overall);
        self.failures += other.failures;
    }
}

/// Gap statistics keyed by `S mod P`, one table per filter, over every anchor.
#[derive(Clone, Debug)]
pub struct GapByResidue {
    tables: Vec<(Primorial, TallyBucket<u64>)>,
    overall: Tally,
}

impl Default for GapByResidue {
    fn default() -> Self {
        Self::new(&Primorial::GRID)
    }
}

impl GapByResidue {
    pub fn new(filters: &[Primorial]) -> Self {
        Self {
            tables: filters.iter().map(|&f| (f, TallyBucket::new())).collect(),
            overall: Tally::default(),
        }
    }

    pub fn overall(&self) -> Tally {
        self.overall
    }

    pub fn get(&self, filter: Primorial, residue: u64) -> Option<&Tally> {
        self.tables
            .iter()
            .find(|(f, _)| *f == filter)
            .and_then(|(_, table)| table.get(&residue))
    }

    pub fn report(&self) -> GapResidueReport {
        let baseline = self.overall.mean();
        GapResidueReport {
            anchors_analyzed: self.overall.count,
            overall_mean_gap: baseline,
            tables: self
                .tables
                .iter()
                .map(|(filter, table)| GapResidueTable {
                    filter: *filter,
                    modulus: filter.modulus(),
                    rows: table
                        .iter()
                        .map(|(residue, tally)| GapRow::new(residue, tally, baseline))
                        .collect(),
                })
                .collect(),
        }
    }
}

impl AnchorSink for GapByResidue {
    fn observe(
        &mut self,
        evaluation: &Evaluation,
        _universe: &PrimeUniverse,
    ) -> Result<(), EngineError> {
        let anchor = evaluation.anchor;
        let gap = anchor.gap();
        self.overall.record(gap);
        for (filter, table) in &mut self.tables {
            table.record(anchor.residue(filter.modulus()), gap);
        }
        Ok(())
    }
}

impl Mergeable for GapByResidue {
    fn merge(&mut self, other: Self) {
        self.overall.absorb(other.overall);
        for ((_, mine), (_, theirs)) in self.tables.iter_mut().zip(other.tables) {
            mine.merge(theirs);
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GapRow {
    /// k_min or residue; 0 on the remainder row
    pub key: u64,
    pub count: u64,
    pub mean_gap: f64,
    pub deviation_percent: f64,
}

impl GapRow {
    fn new(key: u64, tally: Tally, baseline: f64) -> Self {
        let mean_gap = tally.mean();
        Self {
            key,
            count: tally.count,
            mean_gap,
            deviation_percent: deviation_percent(mean_gap, baseline),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GapReport {
    pub anchors_analyzed: u64,
    pub total_failures: u64,
    pub overall_mean_gap: f64,
    pub rows: Vec<GapRow>,
    pub other: Option<GapRow>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GapResidueReport {
    pub anchors_analyzed: u64,
    pub overall_mean_gap: f64,
    pub tables: Vec<GapResidueTable>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GapResidueTable {
    pub filter: Primorial,
    pub modulus: u64,
    /// Residues with at least one anchor, ascending
    pub rows: Vec<GapRow>,
}
