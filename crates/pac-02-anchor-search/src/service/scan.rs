//! Step-wise scan over a validated anchor range.
//!
//! The scan is polled: each `step` evaluates one anchor and feeds it to the
//! sink. Callers may inspect `progress()` and `sink()` between steps. After a
//! sink error the scan is halted and every further step reports `Finished`.

use tracing::error;

use crate::domain::{AnchorRange, ConsecutiveSums, Evaluation};
use crate::error::EngineError;
use crate::metrics::{ScanMetrics, ScanSnapshot};
use crate::ports::{AnchorSink, ProgressObserver};
use crate::service::engine::AnchorEngine;

/// Default anchors between progress callbacks.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 100_000;

/// Result of one `step`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanStep {
    Evaluated(Evaluation),
    Finished,
}

/// Scan state machine
pub struct AnchorScan<'u, S> {
    engine: AnchorEngine<'u>,
    range: AnchorRange,
    anchors: ConsecutiveSums<'u>,
    sink: S,
    metrics: ScanMetrics,
    progress_interval: u64,
    halted: bool,
}

impl<'u, S: AnchorSink> AnchorScan<'u, S> {
    /// Callers validate `range` against the sink's reach first.
    pub(crate) fn new(engine: AnchorEngine<'u>, range: AnchorRange, sink: S) -> Self {
        Self {
            engine,
            range,
            anchors: range.iter(engine.universe().primes()),
            sink,
            metrics: ScanMetrics::new(),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            halted: false,
        }
    }

    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.progress_interval = interval.max(1);
        self
    }

    pub fn range(&self) -> AnchorRange {
        self.range
    }

    /// Index of the next anchor to evaluate.
    pub fn position(&self) -> usize {
        self.anchors.position()
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Evaluate the next anchor.
    pub fn step(&mut self) -> Result<ScanStep, EngineError> {
        if self.halted {
            return Ok(ScanStep::Finished);
        }
        let Some(anchor) = self.anchors.next() else {
            return Ok(ScanStep::Finished);
        };

        let evaluation = self.engine.evaluate(anchor);
        self.metrics.record(&evaluation);
        if let Err(err) = self.sink.observe(&evaluation, self.engine.universe()) {
            self.halted = true;
            error!(index = anchor.index, anchor = anchor.value(), error = %err, "Scan aborted");
            return Err(err);
        }
        Ok(ScanStep::Evaluated(evaluation))
    }

    /// Step until the range is exhausted or the sink fails.
    pub fn run<P: ProgressObserver + ?Sized>(
        &mut self,
        observer: &mut P,
    ) -> Result<ScanSnapshot, EngineError> {
        loop {
            match self.step()? {
                ScanStep::Evaluated(_) => {
                    let processed = self.metrics.snapshot().anchors_processed;
                    if processed % self.progress_interval == 0 {
                        observer.on_progress(&self.progress());
                    }
                }
                ScanStep::Finished => break,
            }
        }
        let snapshot = self.progress();
        observer.on_finish(&snapshot);
        Ok(snapshot)
    }

    pub fn progress(&self) -> ScanSnapshot {
        self.metrics.snapshot()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
