//! # Run Configuration
//!
//! One `RunConfig` per `pac` invocation. Defaults reproduce the reference
//! runs; the CLI and `PAC_*` environment variables override them.

use std::fmt;
use std::path::PathBuf;

use pac_01_prime_universe::{PrimeSource, SievePrimeSource, TextFilePrimeSource};
use pac_02_anchor_search::{
    AnchorRange, Primorial, DEFAULT_PROGRESS_INTERVAL, EXTENDED_SEARCH_CAP, STANDARD_SEARCH_CAP,
};
use pac_03_aggregation::{PipelineKind, PipelineSettings};
use thiserror::Error;

/// First anchor index scanned, clear of the smallest primes.
pub const DEFAULT_START_INDEX: usize = 10;

/// The frequency ranking starts at S_1 = 3 + 5.
pub const FREQUENCY_START_INDEX: usize = 1;

/// Consecutive pairs scanned per run.
pub const DEFAULT_PAIRS: usize = 50_000_000;

pub const DEFAULT_PRIMES_FILE: &str = "primes_100m.txt";

pub const DEFAULT_CSV_FILE: &str = "pac_law3_correlation_data.csv";

/// Where the prime universe comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimeInput {
    /// Ascending listing, optionally truncated to the first `max_count` primes.
    File {
        path: PathBuf,
        max_count: Option<usize>,
    },
    /// Sieve every prime up to `limit`.
    Sieve { limit: u64 },
}

impl PrimeInput {
    pub fn source(&self) -> Box<dyn PrimeSource> {
        match self {
            PrimeInput::File { path, max_count } => {
                let source = TextFilePrimeSource::new(path.clone());
                match max_count {
                    Some(count) => Box::new(source.with_max_count(*count)),
                    None => Box::new(source),
                }
            }
            PrimeInput::Sieve { limit } => Box::new(SievePrimeSource::new(*limit)),
        }
    }
}

/// What a run computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    /// One consecutive-sum pipeline.
    Scan(PipelineKind),
    /// Composite failure rate over the primorial grid.
    Cfr,
}

impl Job {
    pub fn name(self) -> &'static str {
        match self {
            Job::Scan(kind) => kind.name(),
            Job::Cfr => "cfr",
        }
    }

    /// First anchor index when none is given.
    pub fn default_start_index(self) -> usize {
        match self {
            Job::Scan(PipelineKind::Frequency) => FREQUENCY_START_INDEX,
            _ => DEFAULT_START_INDEX,
        }
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Complete configuration of one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub primes: PrimeInput,
    pub job: Job,
    /// First anchor index n.
    pub start_index: usize,
    /// Number of anchors scanned from `start_index`.
    pub pairs: usize,
    pub search_cap: u64,
    /// Cap for the correction run and the 2310 violation detector.
    pub extended_search_cap: u64,
    /// Worker threads; 1 scans sequentially, 0 uses every core.
    pub threads: usize,
    pub progress_interval: u64,
    pub settings: PipelineSettings,
    pub cfr_filters: Vec<Primorial>,
    /// Correction records are written here when set.
    pub csv_path: Option<PathBuf>,
    pub json_report: bool,
    pub log_level: String,
    pub json_logs: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            primes: PrimeInput::File {
                path: PathBuf::from(DEFAULT_PRIMES_FILE),
                max_count: None,
            },
            job: Job::Scan(PipelineKind::Frequency),
            start_index: FREQUENCY_START_INDEX,
            pairs: DEFAULT_PAIRS,
            search_cap: STANDARD_SEARCH_CAP,
            extended_search_cap: EXTENDED_SEARCH_CAP,
            threads: 1,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            settings: PipelineSettings::default(),
            cfr_filters: Primorial::GRID.to_vec(),
            csv_path: None,
            json_report: false,
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

impl RunConfig {
    pub fn new(job: Job) -> Self {
        Self {
            job,
            start_index: job.default_start_index(),
            ..Self::default()
        }
    }

    pub fn with_primes(mut self, primes: PrimeInput) -> Self {
        self.primes = primes;
        self
    }

    pub fn with_range(mut self, start_index: usize, pairs: usize) -> Self {
        self.start_index = start_index;
        self.pairs = pairs;
        self
    }

    pub fn with_search_caps(mut self, standard: u64, extended: u64) -> Self {
        self.search_cap = standard;
        self.extended_search_cap = extended;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.progress_interval = interval;
        self
    }

    pub fn with_settings(mut self, settings: PipelineSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_csv_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.csv_path = Some(path.into());
        self
    }

    pub fn with_json_report(mut self, json: bool) -> Self {
        self.json_report = json;
        self
    }

    pub fn with_logging(mut self, level: impl Into<String>, json: bool) -> Self {
        self.log_level = level.into();
        self.json_logs = json;
        self
    }

    /// Anchor indices scanned: `pairs` anchors from `start_index`. The
    /// correction run starts `max_radius` later so every S_{n-r} exists.
    pub fn range(&self) -> AnchorRange {
        let start = match self.job {
            Job::Scan(PipelineKind::Correction) => {
                self.start_index.saturating_add(self.settings.max_radius)
            }
            _ => self.start_index,
        };
        AnchorRange::starting_at(start, self.pairs)
    }

    /// Search cap for the configured job.
    pub fn effective_search_cap(&self) -> u64 {
        // One cap per run. A violation run watching mod 2310 searches every
        // anchor under every filter to the extended cap, not only the
        // anchors perfect mod 2310; smaller filters see the same k_min
        // wherever the standard cap already finds a prime.
        match self.job {
            Job::Scan(kind) if kind.uses_extended_cap(&self.settings) => self.extended_search_cap,
            _ => self.search_cap,
        }
    }

    /// Worker threads after resolving 0 to the core count.
    pub fn worker_threads(&self) -> usize {
        if self.threads == 0 {
            num_cpus::get()
        } else {
            self.threads
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search_cap == 0 || self.extended_search_cap == 0 {
            return Err(ConfigError::ZeroSearchCap);
        }
        if self.extended_search_cap < self.search_cap {
            return Err(ConfigError::ExtendedCapBelowStandard {
                standard: self.search_cap,
                extended: self.extended_search_cap,
            });
        }
        if self.progress_interval == 0 {
            return Err(ConfigError::ZeroProgressInterval);
        }
        if self.settings.top_n == 0 {
            return Err(ConfigError::ZeroTopN);
        }
        match self.job {
            Job::Cfr if self.cfr_filters.is_empty() => {
                return Err(ConfigError::NoFilters { job: self.job });
            }
            Job::Scan(PipelineKind::Violations) if self.settings.violation_filters.is_empty() => {
                return Err(ConfigError::NoFilters { job: self.job });
            }
            Job::Scan(PipelineKind::GapByResidue) if self.settings.gap_filters.is_empty() => {
                return Err(ConfigError::NoFilters { job: self.job });
            }
            Job::Scan(_) if self.pairs == 0 => return Err(ConfigError::NoPairs),
            Job::Scan(PipelineKind::Correction) if self.settings.max_radius == 0 => {
                return Err(ConfigError::ZeroRadius);
            }
            _ => {}
        }
        if let PrimeInput::File {
            max_count: Some(0), ..
        } = self.primes
        {
            return Err(ConfigError::ZeroMaxPrimes);
        }
        if self.csv_path.is_some() && self.job != Job::Scan(PipelineKind::Correction) {
            return Err(ConfigError::CsvUnsupported { job: self.job });
        }
        Ok(())
    }
}

/// Rejected run configurations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Search caps must be at least 1")]
    ZeroSearchCap,

    #[error("Extended search cap {extended} is below the standard cap {standard}")]
    ExtendedCapBelowStandard { standard: u64, extended: u64 },

    #[error("Progress interval must be at least 1")]
    ZeroProgressInterval,

    #[error("Report row count must be at least 1")]
    ZeroTopN,

    #[error("The {job} run needs at least one primorial filter")]
    NoFilters { job: Job },

    #[error("The anchor range is empty: pairs must be at least 1")]
    NoPairs,

    #[error("Correction radius must be at least 1")]
    ZeroRadius,

    #[error("--max-primes must be at least 1")]
    ZeroMaxPrimes,

    #[error("CSV export is only available for the correction run, not {job}")]
    CsvUnsupported { job: Job },

    #[error("{modulus} is not a primorial filter (expected 6, 30, 210 or 2310)")]
    UnknownModulus { modulus: u64 },
}

/// Map moduli given on the command line to filters.
pub fn parse_filters(moduli: &[u64]) -> Result<Vec<Primorial>, ConfigError> {
    moduli
        .iter()
        .map(|&modulus| {
            Primorial::from_modulus(modulus).ok_or(ConfigError::UnknownModulus { modulus })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_runs() {
        let config = RunConfig::default();
        assert_eq!(config.start_index, 1, "frequency ranking starts at S_1");
        assert_eq!(config.pairs, 50_000_000);
        assert_eq!(config.search_cap, 2000);
        assert_eq!(config.extended_search_cap, 3000);
        assert_eq!(config.settings.max_radius, 30);
        assert_eq!(config.settings.top_n, 20);
        assert_eq!(config.progress_interval, 100_000);
        assert_eq!(config.threads, 1, "sequential unless asked");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_effective_search_cap() {
        assert_eq!(RunConfig::new(Job::Cfr).effective_search_cap(), 2000);
        assert_eq!(
            RunConfig::new(Job::Scan(PipelineKind::Frequency)).effective_search_cap(),
            2000
        );
        assert_eq!(
            RunConfig::new(Job::Scan(PipelineKind::Correction)).effective_search_cap(),
            3000
        );

        let mut violations = RunConfig::new(Job::Scan(PipelineKind::Violations));
        assert_eq!(violations.effective_search_cap(), 3000);
        violations.settings.violation_filters = vec![Primorial::P3];
        assert_eq!(violations.effective_search_cap(), 2000);
    }

    #[test]
    fn test_start_index_per_job() {
        assert_eq!(RunConfig::new(Job::Scan(PipelineKind::Frequency)).start_index, 1);
        for kind in [
            PipelineKind::Violations,
            PipelineKind::Residues,
            PipelineKind::GapByDistance,
            PipelineKind::GapByResidue,
            PipelineKind::Correction,
        ] {
            assert_eq!(RunConfig::new(Job::Scan(kind)).start_index, 10, "{kind} starts at 10");
        }
        assert_eq!(RunConfig::new(Job::Cfr).start_index, 10);
    }

    #[test]
    fn test_range() {
        let config = RunConfig::default().with_range(10, 5);
        assert_eq!(config.range(), AnchorRange::new(10, 15));

        let correction = RunConfig::new(Job::Scan(PipelineKind::Correction)).with_range(10, 5);
        assert_eq!(
            correction.range(),
            AnchorRange::new(40, 45),
            "shifted by the correction radius"
        );
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero_cap = RunConfig::default().with_search_caps(0, 3000);
        assert_eq!(zero_cap.validate(), Err(ConfigError::ZeroSearchCap));

        let inverted = RunConfig::default().with_search_caps(2000, 1000);
        assert!(matches!(
            inverted.validate(),
            Err(ConfigError::ExtendedCapBelowStandard { .. })
        ));

        let no_pairs = RunConfig::default().with_range(10, 0);
        assert_eq!(no_pairs.validate(), Err(ConfigError::NoPairs));

        let mut no_filters = RunConfig::new(Job::Cfr);
        no_filters.cfr_filters.clear();
        assert_eq!(
            no_filters.validate(),
            Err(ConfigError::NoFilters { job: Job::Cfr })
        );

        let csv = RunConfig::new(Job::Scan(PipelineKind::Frequency)).with_csv_path("out.csv");
        assert!(matches!(
            csv.validate(),
            Err(ConfigError::CsvUnsupported { .. })
        ));
        let csv = RunConfig::new(Job::Scan(PipelineKind::Correction)).with_csv_path("out.csv");
        assert!(csv.validate().is_ok());
    }

    #[test]
    fn test_cfr_ignores_pair_count() {
        let config = RunConfig::new(Job::Cfr).with_range(10, 0);
        assert!(config.validate().is_ok(), "the grid run scans primes, not pairs");
    }

    #[test]
    fn test_parse_filters() {
        assert_eq!(
            parse_filters(&[6, 30, 210, 2310]).expect("known moduli"),
            Primorial::ALL.to_vec()
        );
        assert_eq!(
            parse_filters(&[6, 42]),
            Err(ConfigError::UnknownModulus { modulus: 42 })
        );
    }

    #[test]
    fn test_worker_threads() {
        assert_eq!(RunConfig::default().with_threads(4).worker_threads(), 4);
        assert!(RunConfig::default().with_threads(0).worker_threads() >= 1);
    }
}
