//! Partitioned scan across the rayon pool.
//!
//! The range is cut into contiguous partitions, each scanned with its own
//! sink. Results are combined in index order, so merged event lists keep
//! their order and the first fatal error by anchor index wins. Progress from
//! every partition is folded into one set of counters and reported to a
//! single observer.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use rayon::prelude::*;
use tracing::{debug, info};

use crate::domain::AnchorRange;
use crate::error::EngineError;
use crate::metrics::{ScanMetrics, ScanSnapshot};
use crate::ports::{AnchorSink, Mergeable, NoOpProgress, ProgressObserver};
use crate::service::engine::AnchorEngine;
use crate::service::scan::{AnchorScan, DEFAULT_PROGRESS_INTERVAL};

/// Partition count matching the available cores.
pub fn default_partitions() -> usize {
    num_cpus::get().max(1)
}

/// A partitioned scan stopped by an error.
pub struct PartitionAbort<S> {
    pub error: EngineError,
    /// Every partition before the failing one merged with the failing
    /// partition's sink, i.e. exactly the anchors a sequential scan would
    /// have observed. `None` when the range failed validation.
    pub partial: Option<S>,
    /// Counters up to and including the failing anchor.
    pub snapshot: ScanSnapshot,
}

impl<S> PartitionAbort<S> {
    fn rejected(error: EngineError) -> Self {
        Self {
            error,
            partial: None,
            snapshot: ScanSnapshot::default(),
        }
    }
}

impl<S> fmt::Debug for PartitionAbort<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartitionAbort")
            .field("error", &self.error)
            .field("has_partial", &self.partial.is_some())
            .field("snapshot", &self.snapshot)
            .finish()
    }
}

impl<S> From<PartitionAbort<S>> for EngineError {
    fn from(abort: PartitionAbort<S>) -> Self {
        abort.error
    }
}

enum PartitionResult<S> {
    Complete(S, ScanSnapshot),
    Aborted(EngineError, S, ScanSnapshot),
}

/// Combined counters of all partitions plus the observer they report to.
struct SharedProgress<'a, P: ?Sized> {
    totals: ScanMetrics,
    interval: u64,
    observer: Mutex<&'a mut P>,
}

impl<P: ProgressObserver + ?Sized> SharedProgress<'_, P> {
    fn fold(&self, delta: &ScanSnapshot) {
        if delta.anchors_processed == 0 {
            return;
        }
        let totals = self.totals.add(delta);
        let before = totals.anchors_processed - delta.anchors_processed;
        if before / self.interval != totals.anchors_processed / self.interval {
            self.observer
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .on_progress(&totals);
        }
    }
}

/// One partition's view of the shared counters.
struct PartitionProgress<'s, 'a, P: ?Sized> {
    shared: &'s SharedProgress<'a, P>,
    reported: ScanSnapshot,
}

impl<P: ProgressObserver + ?Sized> ProgressObserver for PartitionProgress<'_, '_, P> {
    fn on_progress(&mut self, snapshot: &ScanSnapshot) {
        self.shared.fold(&snapshot.since(&self.reported));
        self.reported = *snapshot;
    }

    fn on_finish(&mut self, snapshot: &ScanSnapshot) {
        self.on_progress(snapshot);
    }
}

impl AnchorEngine<'_> {
    /// Scan `range` in up to `partitions` parallel slices.
    ///
    /// `make_sink` builds one fresh sink per partition. Validation uses the
    /// reach of a probe sink and covers the whole range up front.
    pub fn scan_partitioned<S, F>(
        &self,
        range: AnchorRange,
        partitions: usize,
        make_sink: F,
    ) -> Result<(S, ScanSnapshot), EngineError>
    where
        S: AnchorSink + Mergeable + Send,
        F: Fn() -> S + Sync,
    {
        self.scan_partitioned_with_progress(
            range,
            partitions,
            make_sink,
            &mut NoOpProgress,
            DEFAULT_PROGRESS_INTERVAL,
        )
        .map_err(EngineError::from)
    }

    /// Partitioned scan reporting combined counters to `observer` about
    /// every `progress_interval` anchors, and once at the end.
    ///
    /// On error the abort carries the merged state of every anchor before
    /// the failing one.
    pub fn scan_partitioned_with_progress<S, F, P>(
        &self,
        range: AnchorRange,
        partitions: usize,
        make_sink: F,
        observer: &mut P,
        progress_interval: u64,
    ) -> Result<(S, ScanSnapshot), PartitionAbort<S>>
    where
        S: AnchorSink + Mergeable + Send,
        F: Fn() -> S + Sync,
        P: ProgressObserver + Send + ?Sized,
    {
        let probe = make_sink();
        self.validate_range(range, probe.lookback(), probe.lookahead())
            .map_err(PartitionAbort::rejected)?;
        drop(probe);

        let slices = range.split(partitions);
        info!(
            start = range.start,
            end = range.end,
            partitions = slices.len(),
            "Starting partitioned scan"
        );

        let interval = progress_interval.max(1);
        // Partitions report more often so the combined count crosses each
        // interval close to where a sequential scan would.
        let partition_interval = (interval / slices.len().max(1) as u64).max(1);
        let shared = SharedProgress {
            totals: ScanMetrics::new(),
            interval,
            observer: Mutex::new(observer),
        };

        let engine = *self;
        let results: Vec<PartitionResult<S>> = slices
            .into_par_iter()
            .map(|slice| {
                debug!(start = slice.start, end = slice.end, "Partition started");
                let mut progress = PartitionProgress {
                    shared: &shared,
                    reported: ScanSnapshot::default(),
                };
                let mut scan = AnchorScan::new(engine, slice, make_sink())
                    .with_progress_interval(partition_interval);
                match scan.run(&mut progress) {
                    Ok(snapshot) => {
                        debug!(
                            start = slice.start,
                            end = slice.end,
                            processed = snapshot.anchors_processed,
                            "Partition finished"
                        );
                        PartitionResult::Complete(scan.into_sink(), snapshot)
                    }
                    Err(error) => {
                        let snapshot = scan.progress();
                        PartitionResult::Aborted(error, scan.into_sink(), snapshot)
                    }
                }
            })
            .collect();

        let mut merged: Option<(S, ScanSnapshot)> = None;
        for result in results {
            let (sink, snapshot, failure) = match result {
                PartitionResult::Complete(sink, snapshot) => (sink, snapshot, None),
                PartitionResult::Aborted(error, sink, snapshot) => (sink, snapshot, Some(error)),
            };
            let (total_sink, total) = match merged.take() {
                Some((mut total_sink, mut total)) => {
                    total_sink.merge(sink);
                    total.absorb(&snapshot);
                    (total_sink, total)
                }
                None => (sink, snapshot),
            };
            if let Some(error) = failure {
                return Err(PartitionAbort {
                    error,
                    partial: Some(total_sink),
                    snapshot: total,
                });
            }
            merged = Some((total_sink, total));
        }

        let (sink, snapshot) = merged.ok_or_else(|| {
            PartitionAbort::rejected(EngineError::EmptyRange {
                start: range.start,
                end: range.end,
            })
        })?;
        shared
            .observer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .on_finish(&snapshot);
        Ok((sink, snapshot))
    }
}
