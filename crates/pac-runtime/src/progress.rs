//! Progress observer that reports through `tracing`.

use std::time::Instant;

use pac_02_anchor_search::{ProgressObserver, ScanSnapshot};
use tracing::{info, warn};

/// Logs scan counters every progress interval and a summary at the end.
#[derive(Debug)]
pub struct LogProgress {
    total: u64,
    started: Instant,
}

impl LogProgress {
    pub fn new(total: u64) -> Self {
        Self {
            total,
            started: Instant::now(),
        }
    }

    fn percent_done(&self, processed: u64) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            processed as f64 / self.total as f64 * 100.0
        }
    }

    fn rate(&self, processed: u64) -> f64 {
        let secs = self.started.elapsed().as_secs_f64();
        if secs > 0.0 {
            processed as f64 / secs
        } else {
            0.0
        }
    }
}

impl ProgressObserver for LogProgress {
    fn on_progress(&mut self, snapshot: &ScanSnapshot) {
        let processed = snapshot.anchors_processed;
        info!(
            processed,
            total = self.total,
            percent = format_args!("{:.1}", self.percent_done(processed)),
            failures = snapshot.composite_failures,
            skipped = snapshot.anchors_skipped,
            anchors_per_sec = format_args!("{:.0}", self.rate(processed)),
            "Scan progress"
        );
    }

    fn on_finish(&mut self, snapshot: &ScanSnapshot) {
        info!(
            processed = snapshot.anchors_processed,
            successes = snapshot.successes,
            failures = snapshot.composite_failures,
            failure_rate = format_args!("{:.4}%", snapshot.failure_rate_percent()),
            mean_k = format_args!("{:.3}", snapshot.mean_distance()),
            elapsed_secs = format_args!("{:.1}", self.started.elapsed().as_secs_f64()),
            "Scan finished"
        );
        if snapshot.anchors_skipped > 0 {
            warn!(
                skipped = snapshot.anchors_skipped,
                "Anchors skipped: no prime within the search cap"
            );
        }
    }
}
