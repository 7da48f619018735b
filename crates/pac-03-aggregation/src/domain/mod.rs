//! Domain Layer - aggregation state and reports
//!
//! Every pipeline is an `AnchorSink` (or `GridSink`) that is also
//! `Mergeable`, so partitioned scans can combine per-partition state.

pub mod bucket;
pub mod cfr;
pub mod correction;
pub mod frequency;
pub mod gap;
pub mod residue;
pub mod violation;

pub use bucket::{percent, Tally, TallyBucket};
pub use cfr::{CfrReport, CfrRow, CfrTally};
pub use correction::{
    CorrectionRadius, CorrectionRecord, CorrectionSummary, FixDistribution, RadiusRow,
    ResidueRadiusRow, ResidueShare, DEFAULT_FOCUS_RESIDUES, DEFAULT_MAX_RADIUS,
};
pub use frequency::{FrequencyReport, FrequencyRow, FrequencyTally, OtherRow};
pub use gap::{
    deviation_percent, GapByDistance, GapByResidue, GapReport, GapResidueReport, GapResidueTable,
    GapRow,
};
pub use residue::{
    reachable_residues, KShare, ResidueClassReport, ResidueReport, ResidueTally, TOP_PER_RESIDUE,
};
pub use violation::{FilterReport, KCount, ViolationDetector, ViolationReport};
