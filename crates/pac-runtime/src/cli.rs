//! Command-line interface of the `pac` binary.
//!
//! One subcommand per analysis. Shared run parameters are global flags with
//! `PAC_*` environment fallbacks.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pac_02_anchor_search::{
    Primorial, DEFAULT_PROGRESS_INTERVAL, EXTENDED_SEARCH_CAP, STANDARD_SEARCH_CAP,
};
use pac_03_aggregation::{
    PipelineKind, PipelineSettings, DEFAULT_FOCUS_RESIDUES, DEFAULT_MAX_RADIUS,
};

use crate::config::{
    parse_filters, ConfigError, Job, PrimeInput, RunConfig, DEFAULT_CSV_FILE, DEFAULT_PAIRS,
    DEFAULT_PRIMES_FILE,
};

/// Nearest-prime distances around sums of consecutive primes
#[derive(Debug, Parser)]
#[command(name = "pac", version)]
pub struct Cli {
    /// Ascending prime listing, one prime per line
    #[arg(long, env = "PAC_PRIMES", global = true)]
    pub primes: Option<PathBuf>,

    /// Sieve every prime up to this bound instead of reading a listing
    #[arg(
        long,
        env = "PAC_SIEVE_LIMIT",
        global = true,
        conflicts_with_all = ["primes", "max_primes"]
    )]
    pub sieve_limit: Option<u64>,

    /// Read only the first N primes of the listing
    #[arg(long, env = "PAC_MAX_PRIMES", global = true)]
    pub max_primes: Option<usize>,

    /// First anchor index n [default: 1 for frequency, 10 otherwise]
    #[arg(long, env = "PAC_START_INDEX", global = true)]
    pub start_index: Option<usize>,

    /// Number of consecutive pairs to scan
    #[arg(long, env = "PAC_PAIRS", global = true, default_value_t = DEFAULT_PAIRS)]
    pub pairs: usize,

    /// Nearest-prime search cap
    #[arg(long, env = "PAC_SEARCH_CAP", global = true, default_value_t = STANDARD_SEARCH_CAP)]
    pub search_cap: u64,

    /// Search cap for the correction run and the mod-2310 detector
    #[arg(
        long,
        env = "PAC_EXTENDED_SEARCH_CAP",
        global = true,
        default_value_t = EXTENDED_SEARCH_CAP
    )]
    pub extended_search_cap: u64,

    /// Worker threads; 1 scans sequentially, 0 uses every core
    #[arg(long, env = "PAC_THREADS", global = true, default_value_t = 1)]
    pub threads: usize,

    /// Anchors between progress log lines
    #[arg(long, global = true, default_value_t = DEFAULT_PROGRESS_INTERVAL)]
    pub progress_interval: u64,

    /// Rows in ranked tables
    #[arg(long, global = true, default_value_t = 20)]
    pub top: usize,

    /// Print the report as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "PAC_LOG_LEVEL", global = true, default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, env = "PAC_JSON_LOGS", global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Rank composite nearest-prime distances by frequency
    Frequency,

    /// Composite failure rate of primorial grid anchors
    Cfr {
        /// Primorial moduli to compare
        #[arg(long, value_delimiter = ',', default_values_t = [6u64, 30, 210])]
        moduli: Vec<u64>,
    },

    /// Look for failures at perfect anchors whose distance shares a forbidden factor
    Violations {
        #[arg(long, value_delimiter = ',', default_values_t = [6u64, 30, 210, 2310])]
        moduli: Vec<u64>,
    },

    /// Tabulate failures by (S mod M, k)
    Residues {
        #[arg(long, default_value_t = 30)]
        modulus: u64,
    },

    /// Mean prime gap per composite distance
    GapByDistance,

    /// Mean prime gap per anchor residue class
    GapByResidue {
        #[arg(long, value_delimiter = ',', default_values_t = [6u64, 30, 210])]
        moduli: Vec<u64>,
    },

    /// Radius to the nearest anchor that corrects each failure
    Correction {
        #[arg(long, default_value_t = DEFAULT_MAX_RADIUS)]
        max_radius: usize,

        /// S mod 30 classes whose fixing residues are broken down
        #[arg(long, value_delimiter = ',', default_values_t = DEFAULT_FOCUS_RESIDUES)]
        focus: Vec<u64>,

        /// Export every correction as CSV
        #[arg(long, num_args = 0..=1, default_missing_value = DEFAULT_CSV_FILE)]
        csv: Option<PathBuf>,
    },
}

impl Cli {
    /// Resolve flags and subcommand into a run configuration.
    pub fn into_config(self) -> Result<RunConfig, ConfigError> {
        let mut settings = PipelineSettings {
            top_n: self.top,
            ..PipelineSettings::default()
        };
        let mut cfr_filters = Primorial::GRID.to_vec();
        let mut csv_path = None;

        let job = match self.command {
            Command::Frequency => Job::Scan(PipelineKind::Frequency),
            Command::Cfr { moduli } => {
                cfr_filters = parse_filters(&moduli)?;
                Job::Cfr
            }
            Command::Violations { moduli } => {
                settings.violation_filters = parse_filters(&moduli)?;
                Job::Scan(PipelineKind::Violations)
            }
            Command::Residues { modulus } => {
                settings.residue_filter = Primorial::from_modulus(modulus)
                    .ok_or(ConfigError::UnknownModulus { modulus })?;
                Job::Scan(PipelineKind::Residues)
            }
            Command::GapByDistance => Job::Scan(PipelineKind::GapByDistance),
            Command::GapByResidue { moduli } => {
                settings.gap_filters = parse_filters(&moduli)?;
                Job::Scan(PipelineKind::GapByResidue)
            }
            Command::Correction {
                max_radius,
                focus,
                csv,
            } => {
                settings.max_radius = max_radius;
                settings.focus_residues = focus;
                csv_path = csv;
                Job::Scan(PipelineKind::Correction)
            }
        };

        let primes = match self.sieve_limit {
            Some(limit) => PrimeInput::Sieve { limit },
            None => PrimeInput::File {
                path: self
                    .primes
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_PRIMES_FILE)),
                max_count: self.max_primes,
            },
        };

        let start_index = self
            .start_index
            .unwrap_or_else(|| job.default_start_index());
        let mut config = RunConfig::new(job)
            .with_primes(primes)
            .with_range(start_index, self.pairs)
            .with_search_caps(self.search_cap, self.extended_search_cap)
            .with_threads(self.threads)
            .with_progress_interval(self.progress_interval)
            .with_settings(settings)
            .with_json_report(self.json)
            .with_logging(self.log_level, self.json_logs);
        config.cfr_filters = cfr_filters;
        config.csv_path = csv_path;
        Ok(config)
    }
}
