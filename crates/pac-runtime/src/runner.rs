//! Run orchestration: universe loading, engine setup and pipeline dispatch.

use std::time::{Duration, Instant};

use pac_01_prime_universe::{PrimeUniverse, UniverseError};
use pac_02_anchor_search::{AnchorEngine, EngineError, ScanSnapshot};
use pac_03_aggregation::{
    CfrTally, CorrectionRecord, Pipeline, PipelineKind, PipelineReport, PipelineSettings,
};
use thiserror::Error;
use tracing::{error, info};

use crate::config::{ConfigError, Job, RunConfig};
use crate::progress::LogProgress;

/// Reasons a run produces no report.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to load primes: {0}")]
    Universe(#[from] UniverseError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Law III falsified; `partial` holds every correction made before it.
    #[error("{source}")]
    Falsified {
        source: EngineError,
        partial: Vec<CorrectionRecord>,
    },

    #[error("Failed to build the worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Everything a finished run hands to the reporter.
#[derive(Debug)]
pub struct RunOutcome {
    pub job: Job,
    pub primes_loaded: usize,
    pub max_prime: u64,
    pub search_cap: u64,
    /// Anchor counters; absent for the grid run.
    pub snapshot: Option<ScanSnapshot>,
    pub report: PipelineReport,
    /// Correction run only.
    pub records: Vec<CorrectionRecord>,
    pub elapsed: Duration,
}

/// Executes one configured run.
pub struct Runner {
    config: RunConfig,
}

impl Runner {
    pub fn new(config: RunConfig) -> Result<Self, RunError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn load_universe(&self) -> Result<PrimeUniverse, RunError> {
        let source = self.config.primes.source();
        info!(source = %source.describe(), "Loading primes");
        let universe = PrimeUniverse::load(source.as_ref())?;
        info!(
            primes = universe.len(),
            max_prime = universe.max_prime(),
            index_mib = universe.index_bytes() / (1024 * 1024),
            "Prime universe ready"
        );
        Ok(universe)
    }

    pub fn run(&self) -> Result<RunOutcome, RunError> {
        let universe = self.load_universe()?;
        self.run_with(&universe)
    }

    /// Run against an already loaded universe.
    pub fn run_with(&self, universe: &PrimeUniverse) -> Result<RunOutcome, RunError> {
        let started = Instant::now();
        let search_cap = self.config.effective_search_cap();
        let engine = AnchorEngine::new(universe, search_cap)?;
        info!(job = %self.config.job, search_cap, "Run started");

        let (snapshot, report, records) = match self.config.job {
            Job::Cfr => {
                let mut tally = CfrTally::new(self.config.cfr_filters.clone());
                engine.scan_grid(&self.config.cfr_filters, &mut tally)?;
                (None, PipelineReport::Cfr(tally.report()), Vec::new())
            }
            Job::Scan(kind) => {
                let (pipeline, snapshot) = if self.config.worker_threads() > 1 {
                    self.scan_parallel(&engine, kind)?
                } else {
                    self.scan_sequential(&engine, kind)?
                };
                let report = pipeline.report(&self.config.settings);
                let records = match pipeline {
                    Pipeline::Correction(correction) => correction.into_records(),
                    _ => Vec::new(),
                };
                (Some(snapshot), report, records)
            }
        };

        let elapsed = started.elapsed();
        info!(
            job = %self.config.job,
            elapsed_secs = format_args!("{:.1}", elapsed.as_secs_f64()),
            "Run finished"
        );
        Ok(RunOutcome {
            job: self.config.job,
            primes_loaded: universe.len(),
            max_prime: universe.max_prime(),
            search_cap,
            snapshot,
            report,
            records,
            elapsed,
        })
    }

    /// Step-wise scan; on falsification the corrections made so far survive.
    fn scan_sequential(
        &self,
        engine: &AnchorEngine<'_>,
        kind: PipelineKind,
    ) -> Result<(Pipeline, ScanSnapshot), RunError> {
        let range = self.config.range();
        let sink = Pipeline::new(kind, &self.config.settings);
        let mut scan = engine
            .scan(range, sink)?
            .with_progress_interval(self.config.progress_interval);
        let mut progress = LogProgress::new(range.len() as u64);

        match scan.run(&mut progress) {
            Ok(snapshot) => Ok((scan.into_sink(), snapshot)),
            Err(source) if source.is_falsification() => {
                let partial = match scan.into_sink() {
                    Pipeline::Correction(correction) => correction.into_records(),
                    _ => Vec::new(),
                };
                error!(
                    corrected = partial.len(),
                    index = ?source.anchor_index(),
                    "Run stopped by Law III falsification"
                );
                Err(RunError::Falsified { source, partial })
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Partitioned scan on a dedicated pool; on falsification the
    /// corrections before the failing anchor survive as in `scan_sequential`.
    fn scan_parallel(
        &self,
        engine: &AnchorEngine<'_>,
        kind: PipelineKind,
    ) -> Result<(Pipeline, ScanSnapshot), RunError> {
        let threads = self.config.worker_threads();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("pac-scan-{i}"))
            .build()?;
        let settings: &PipelineSettings = &self.config.settings;
        let range = self.config.range();

        let mut progress = LogProgress::new(range.len() as u64);
        let interval = self.config.progress_interval;

        let result = pool.install(|| {
            engine.scan_partitioned_with_progress(
                range,
                threads,
                || Pipeline::new(kind, settings),
                &mut progress,
                interval,
            )
        });
        match result {
            Ok(done) => Ok(done),
            Err(abort) if abort.error.is_falsification() => {
                let partial = match abort.partial {
                    Some(Pipeline::Correction(correction)) => correction.into_records(),
                    _ => Vec::new(),
                };
                error!(
                    corrected = partial.len(),
                    index = ?abort.error.anchor_index(),
                    "Run stopped by Law III falsification"
                );
                Err(RunError::Falsified {
                    source: abort.error,
                    partial,
                })
            }
            Err(abort) => Err(abort.error.into()),
        }
    }
}
