//! Outbound Ports (Driven Ports)
//!
//! The engine pushes every evaluation into a sink and reports progress to an
//! observer. Aggregation pipelines live behind these traits.

use pac_01_prime_universe::PrimeUniverse;

use crate::domain::{Evaluation, GridEvaluation};
use crate::error::EngineError;
use crate::metrics::ScanSnapshot;

/// Consumer of consecutive-sum evaluations, in index order.
///
/// A sink that inspects neighbouring anchors declares how far it reaches in
/// each direction; the engine validates those indices before the scan
/// starts so `observe` can rely on them existing.
pub trait AnchorSink {
    /// Consume one evaluation. Skipped anchors are delivered too; the sink
    /// decides whether they count.
    fn observe(&mut self, evaluation: &Evaluation, universe: &PrimeUniverse)
        -> Result<(), EngineError>;

    /// Anchors before the current one the sink may read.
    fn lookback(&self) -> usize {
        0
    }

    /// Anchors after the current one the sink may read.
    fn lookahead(&self) -> usize {
        0
    }
}

/// Consumer of primorial-grid evaluations.
pub trait GridSink {
    /// All filters for one tested prime q, in filter order.
    fn observe_prime(&mut self, prime: u64, evaluations: &[GridEvaluation])
        -> Result<(), EngineError>;
}

/// Key-wise combination of partition results.
///
/// `other` always covers anchors after those already in `self`.
pub trait Mergeable {
    fn merge(&mut self, other: Self);
}

/// Receives scan snapshots at a fixed anchor interval.
pub trait ProgressObserver {
    fn on_progress(&mut self, snapshot: &ScanSnapshot);

    /// Called once after the last anchor.
    fn on_finish(&mut self, _snapshot: &ScanSnapshot) {}
}

/// Discards progress.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpProgress;

impl ProgressObserver for NoOpProgress {
    fn on_progress(&mut self, _snapshot: &ScanSnapshot) {}
}
