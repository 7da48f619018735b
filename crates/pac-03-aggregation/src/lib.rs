//! # PAC-03 Aggregation
//!
//! Statistics over the stream of Law I evaluations produced by
//! `pac-02-anchor-search`.
//!
//! ## Pipelines
//!
//! | Pipeline            | Input            | Output                                  |
//! |---------------------|------------------|-----------------------------------------|
//! | `FrequencyTally`    | failures         | k_min histogram, top N + remainder      |
//! | `CfrTally`          | grid anchors     | failure rate per primorial filter       |
//! | `ViolationDetector` | perfect anchors  | forbidden-factor violations (Law II)    |
//! | `ResidueTally`      | failures         | (S mod M, k_min) table                  |
//! | `GapByDistance`     | every anchor     | mean prime gap per k_min                |
//! | `GapByResidue`      | every anchor     | mean prime gap per S mod M              |
//! | `CorrectionRadius`  | failures         | radius to the nearest clean anchor      |
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): sink state, merge rules, report shapes
//! - **Service Layer** (`service/`): [`Pipeline`] for run-time dispatch
//!
//! ## Invariants
//!
//! - **INVARIANT-1**: merging partition states in index order gives the same
//!   report as a single sequential scan
//! - **INVARIANT-2**: skipped anchors feed only the "every anchor" baselines
//! - **INVARIANT-3**: a correction search that exhausts its radius aborts the run

pub mod domain;
pub mod service;

// Re-exports for convenience
pub use domain::{
    deviation_percent, percent, reachable_residues, CfrReport, CfrRow, CfrTally,
    CorrectionRadius, CorrectionRecord, CorrectionSummary, FilterReport, FixDistribution,
    FrequencyReport, FrequencyRow, FrequencyTally, GapByDistance, GapByResidue, GapReport,
    GapResidueReport, GapResidueTable, GapRow, KCount, KShare, OtherRow, RadiusRow,
    ResidueClassReport, ResidueRadiusRow, ResidueReport, ResidueShare, ResidueTally, Tally,
    TallyBucket, ViolationDetector, ViolationReport, DEFAULT_FOCUS_RESIDUES, DEFAULT_MAX_RADIUS,
    TOP_PER_RESIDUE,
};
pub use service::{Pipeline, PipelineKind, PipelineReport, PipelineSettings};
