//! Run-time pipeline selection.

use std::fmt;

use pac_01_prime_universe::PrimeUniverse;
use pac_02_anchor_search::{AnchorSink, EngineError, Evaluation, Mergeable, Primorial};
use serde::{Deserialize, Serialize};

use crate::domain::{
    CfrReport, CorrectionRadius, CorrectionSummary, FrequencyReport, FrequencyTally,
    GapByDistance, GapByResidue, GapReport, GapResidueReport, ResidueReport, ResidueTally,
    ViolationDetector, ViolationReport, DEFAULT_FOCUS_RESIDUES, DEFAULT_MAX_RADIUS,
};

/// Consecutive-sum pipelines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineKind {
    Frequency,
    Violations,
    Residues,
    GapByDistance,
    GapByResidue,
    Correction,
}

impl PipelineKind {
    pub const ALL: [PipelineKind; 6] = [
        PipelineKind::Frequency,
        PipelineKind::Violations,
        PipelineKind::Residues,
        PipelineKind::GapByDistance,
        PipelineKind::GapByResidue,
        PipelineKind::Correction,
    ];

    /// Whether the run needs the extended search cap: the correction run,
    /// and the violation run once the 2310 filter is watched.
    ///
    /// The cap applies to the whole run, so a violation run with P_5 uses
    /// it for every anchor and filter.
    pub fn uses_extended_cap(self, settings: &PipelineSettings) -> bool {
        match self {
            PipelineKind::Correction => true,
            PipelineKind::Violations => settings.violation_filters.contains(&Primorial::P5),
            _ => false,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PipelineKind::Frequency => "frequency",
            PipelineKind::Violations => "violations",
            PipelineKind::Residues => "residues",
            PipelineKind::GapByDistance => "gap-by-distance",
            PipelineKind::GapByResidue => "gap-by-residue",
            PipelineKind::Correction => "correction",
        }
    }
}

impl fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Knobs shared by pipeline construction and reporting.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineSettings {
    /// Rows in ranked tables
    pub top_n: usize,
    pub violation_filters: Vec<Primorial>,
    pub residue_filter: Primorial,
    pub gap_filters: Vec<Primorial>,
    pub max_radius: usize,
    pub focus_residues: Vec<u64>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            top_n: 20,
            violation_filters: Primorial::ALL.to_vec(),
            residue_filter: Primorial::P3,
            gap_filters: Primorial::GRID.to_vec(),
            max_radius: DEFAULT_MAX_RADIUS,
            focus_residues: DEFAULT_FOCUS_RESIDUES.to_vec(),
        }
    }
}

/// One aggregation strategy, selected at run time.
#[derive(Clone, Debug)]
pub enum Pipeline {
    Frequency(FrequencyTally),
    Violations(ViolationDetector),
    Residues(ResidueTally),
    GapByDistance(GapByDistance),
    GapByResidue(GapByResidue),
    Correction(CorrectionRadius),
}

impl Pipeline {
    pub fn new(kind: PipelineKind, settings: &PipelineSettings) -> Self {
        match kind {
            PipelineKind::Frequency => Pipeline::Frequency(FrequencyTally::new()),
            PipelineKind::Violations => {
                Pipeline::Violations(ViolationDetector::new(&settings.violation_filters))
            }
            PipelineKind::Residues => Pipeline::Residues(ResidueTally::new(settings.residue_filter)),
            PipelineKind::GapByDistance => Pipeline::GapByDistance(GapByDistance::new()),
            PipelineKind::GapByResidue => {
                Pipeline::GapByResidue(GapByResidue::new(&settings.gap_filters))
            }
            PipelineKind::Correction => Pipeline::Correction(
                CorrectionRadius::new(settings.max_radius)
                    .with_focus_residues(settings.focus_residues.clone()),
            ),
        }
    }

    pub fn kind(&self) -> PipelineKind {
        match self {
            Pipeline::Frequency(_) => PipelineKind::Frequency,
            Pipeline::Violations(_) => PipelineKind::Violations,
            Pipeline::Residues(_) => PipelineKind::Residues,
            Pipeline::GapByDistance(_) => PipelineKind::GapByDistance,
            Pipeline::GapByResidue(_) => PipelineKind::GapByResidue,
            Pipeline::Correction(_) => PipelineKind::Correction,
        }
    }

    pub fn report(&self, settings: &PipelineSettings) -> PipelineReport {
        match self {
            Pipeline::Frequency(p) => PipelineReport::Frequency(p.report(settings.top_n)),
            Pipeline::Violations(p) => PipelineReport::Violations(p.report()),
            Pipeline::Residues(p) => PipelineReport::Residues(p.report()),
            Pipeline::GapByDistance(p) => PipelineReport::GapByDistance(p.report(settings.top_n)),
            Pipeline::GapByResidue(p) => PipelineReport::GapByResidue(p.report()),
            Pipeline::Correction(p) => PipelineReport::Correction(p.summary()),
        }
    }

    fn sink(&mut self) -> &mut dyn AnchorSink {
        match self {
            Pipeline::Frequency(p) => p,
            Pipeline::Violations(p) => p,
            Pipeline::Residues(p) => p,
            Pipeline::GapByDistance(p) => p,
            Pipeline::GapByResidue(p) => p,
            Pipeline::Correction(p) => p,
        }
    }
}

impl AnchorSink for Pipeline {
    fn observe(
        &mut self,
        evaluation: &Evaluation,
        universe: &PrimeUniverse,
    ) -> Result<(), EngineError> {
        self.sink().observe(evaluation, universe)
    }

    fn lookback(&self) -> usize {
        match self {
            Pipeline::Correction(p) => p.lookback(),
            _ => 0,
        }
    }

    fn lookahead(&self) -> usize {
        match self {
            Pipeline::Correction(p) => p.lookahead(),
            _ => 0,
        }
    }
}

impl Mergeable for Pipeline {
    /// Partitions are built by one factory, so kinds always match; a
    /// mismatched `other` is dropped.
    fn merge(&mut self, other: Self) {
        match (self, other) {
            (Pipeline::Frequency(a), Pipeline::Frequency(b)) => a.merge(b),
            (Pipeline::Violations(a), Pipeline::Violations(b)) => a.merge(b),
            (Pipeline::Residues(a), Pipeline::Residues(b)) => a.merge(b),
            (Pipeline::GapByDistance(a), Pipeline::GapByDistance(b)) => a.merge(b),
            (Pipeline::GapByResidue(a), Pipeline::GapByResidue(b)) => a.merge(b),
            (Pipeline::Correction(a), Pipeline::Correction(b)) => a.merge(b),
            (mine, theirs) => {
                tracing::warn!(
                    kind = %mine.kind(),
                    other = %theirs.kind(),
                    "Dropping mismatched partition"
                );
            }
        }
    }
}

/// Output of any pipeline, tagged for JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "pipeline", content = "report", rename_all = "snake_case")]
pub enum PipelineReport {
    Frequency(FrequencyReport),
    Cfr(CfrReport),
    Violations(ViolationReport),
    Residues(ResidueReport),
    GapByDistance(GapReport),
    GapByResidue(GapResidueReport),
    Correction(CorrectionSummary),
}
