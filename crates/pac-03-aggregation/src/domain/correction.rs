//! Law III correction radius.
//!
//! For every composite failure at index n with neighbour prime q, the
//! neighbouring anchors are tried outward: S_{n-r} first, then S_{n+r}, for
//! r = 1..=max_radius. The first anchor at a clean distance (1 or prime)
//! from q fixes the failure. No fix within the radius falsifies Law III and
//! aborts the run.

use pac_01_prime_universe::PrimeUniverse;
use pac_02_anchor_search::{
    is_clean_distance, Anchor, AnchorSink, EngineError, Evaluation, FailureEvent, Mergeable,
    ResidueSignature,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::bucket::{percent, Tally, TallyBucket};

/// Largest radius searched by default.
pub const DEFAULT_MAX_RADIUS: usize = 30;

/// Anchor residues (mod 30) whose fixing anchors are broken down in the summary.
pub const DEFAULT_FOCUS_RESIDUES: [u64; 2] = [0, 12];

/// One corrected failure, as exported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionRecord {
    pub index: usize,
    pub anchor: u64,
    pub neighbor_prime: u64,
    pub k_min: u64,
    pub anchor_residues: ResidueSignature,
    pub radius: usize,
    pub fix_index: usize,
    pub fix_anchor: u64,
    pub fix_residues: ResidueSignature,
}

impl CorrectionRecord {
    fn new(event: &FailureEvent, radius: usize, fix: Anchor) -> Self {
        Self {
            index: event.index,
            anchor: event.anchor,
            neighbor_prime: event.neighbor_prime,
            k_min: event.k_min,
            anchor_residues: ResidueSignature::of(event.anchor),
            radius,
            fix_index: fix.index,
            fix_anchor: fix.value(),
            fix_residues: fix.signature(),
        }
    }
}

/// Finds the correction radius of every composite failure.
#[derive(Clone, Debug)]
pub struct CorrectionRadius {
    max_radius: usize,
    focus_residues: Vec<u64>,
    records: Vec<CorrectionRecord>,
}

impl Default for CorrectionRadius {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RADIUS)
    }
}

impl CorrectionRadius {
    pub fn new(max_radius: usize) -> Self {
        Self {
            max_radius,
            focus_residues: DEFAULT_FOCUS_RESIDUES.to_vec(),
            records: Vec::new(),
        }
    }

    pub fn with_focus_residues(mut self, residues: Vec<u64>) -> Self {
        self.focus_residues = residues;
        self
    }

    pub fn max_radius(&self) -> usize {
        self.max_radius
    }

    /// Records in index order.
    pub fn records(&self) -> &[CorrectionRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<CorrectionRecord> {
        self.records
    }

    /// Search outward from `event` for a clean neighbouring anchor.
    pub fn correct(
        &self,
        event: &FailureEvent,
        universe: &PrimeUniverse,
    ) -> Result<CorrectionRecord, EngineError> {
        let primes = universe.primes();
        let neighbor = |index: Option<usize>| {
            index
                .and_then(|i| Anchor::at(primes, i))
                .ok_or(EngineError::IndexOutOfRange {
                    required: event.index.saturating_add(self.max_radius + 2),
                    available: primes.len(),
                })
        };

        for r in 1..=self.max_radius {
            for candidate in [event.index.checked_sub(r), event.index.checked_add(r)] {
                let fix = neighbor(candidate)?;
                let k = fix.value().abs_diff(event.neighbor_prime);
                if is_clean_distance(k, universe) {
                    return Ok(CorrectionRecord::new(event, r, fix));
                }
            }
        }

        error!(
            index = event.index,
            anchor = event.anchor,
            neighbor_prime = event.neighbor_prime,
            k = event.k_min,
            max_radius = self.max_radius,
            "Law III falsified"
        );
        Err(EngineError::CorrectionExhausted {
            index: event.index,
            anchor: event.anchor,
            neighbor_prime: event.neighbor_prime,
            k_min: event.k_min,
            max_radius: self.max_radius,
        })
    }

    pub fn summary(&self) -> CorrectionSummary {
        let total = self.records.len() as u64;

        let mut radii: TallyBucket<usize> = TallyBucket::new();
        let mut by_residue: TallyBucket<u64> = TallyBucket::new();
        for record in &self.records {
            radii.increment(record.radius);
            by_residue.record(record.anchor_residues.mod30, record.radius as u64);
        }

        let mut cumulative = 0;
        let radius_rows = radii
            .iter()
            .map(|(radius, tally)| {
                cumulative += tally.count;
                RadiusRow {
                    radius,
                    count: tally.count,
                    percent: percent(tally.count, total),
                    cumulative_percent: percent(cumulative, total),
                }
            })
            .collect();

        let fix_distributions = self
            .focus_residues
            .iter()
            .map(|&residue| self.fix_distribution(residue))
            .collect();

        CorrectionSummary {
            max_radius: self.max_radius,
            total_failures: total,
            max_radius_observed: self.records.iter().map(|r| r.radius).max().unwrap_or(0),
            radius_rows,
            by_residue: by_residue
                .iter()
                .map(|(residue, tally)| ResidueRadiusRow {
                    residue,
                    failures: tally.count,
                    mean_radius: tally.mean(),
                })
                .collect(),
            fix_distributions,
        }
    }

    fn fix_distribution(&self, anchor_residue: u64) -> FixDistribution {
        let mut fixes: TallyBucket<u64> = TallyBucket::new();
        for record in &self.records {
            if record.anchor_residues.mod30 == anchor_residue {
                fixes.increment(record.fix_residues.mod30);
            }
        }
        let failures = fixes.total().count;
        FixDistribution {
            anchor_residue,
            failures,
            rows: fixes
                .iter()
                .map(|(residue, Tally { count, .. })| ResidueShare {
                    residue,
                    count,
                    percent: percent(count, failures),
                })
                .collect(),
        }
    }
}

impl AnchorSink for CorrectionRadius {
    fn observe(
        &mut self,
        evaluation: &Evaluation,
        universe: &PrimeUniverse,
    ) -> Result<(), EngineError> {
        let Some(event) = evaluation.failure() else {
            return Ok(());
        };
        let record = self.correct(&event, universe)?;
        debug!(index = record.index, radius = record.radius, "Failure corrected");
        self.records.push(record);
        Ok(())
    }

    fn lookback(&self) -> usize {
        self.max_radius
    }

    fn lookahead(&self) -> usize {
        self.max_radius
    }
}

impl Mergeable for CorrectionRadius {
    fn merge(&mut self, other: Self) {
        self.records.extend(other.records);
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CorrectionSummary {
    pub max_radius: usize,
    pub total_failures: u64,
    pub max_radius_observed: usize,
    pub radius_rows: Vec<RadiusRow>,
    /// Mean radius per S mod 30
    pub by_residue: Vec<ResidueRadiusRow>,
    /// S_fix mod 30 for failures in selected S mod 30 classes
    pub fix_distributions: Vec<FixDistribution>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RadiusRow {
    pub radius: usize,
    pub count: u64,
    pub percent: f64,
    pub cumulative_percent: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResidueRadiusRow {
    pub residue: u64,
    pub failures: u64,
    pub mean_radius: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FixDistribution {
    pub anchor_residue: u64,
    pub failures: u64,
    pub rows: Vec<ResidueShare>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResidueShare {
    pub residue: u64,
    pub count: u64,
    pub percent: f64,
}
