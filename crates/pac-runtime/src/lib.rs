//! # PAC Runtime
//!
//! Drives one analysis per invocation of the `pac` binary.
//!
//! ## Run Sequence
//!
//! 1. Parse CLI flags and `PAC_*` environment variables into a `RunConfig`
//! 2. Initialize logging (`RUST_LOG` overrides the configured level)
//! 3. Load the prime universe from a listing or the sieve
//! 4. Scan the anchor range (sequentially, or partitioned on a rayon pool)
//!    or, for the CFR run, the primorial grid
//! 5. Emit the report as text or JSON; export correction records as CSV
//!
//! ## Modules
//!
//! - `cli` - clap definitions
//! - `config` - `RunConfig`, defaults and validation
//! - `telemetry` - tracing subscriber setup
//! - `progress` - `ProgressObserver` that logs scan counters
//! - `runner` - universe loading and pipeline dispatch
//! - `report` - text and JSON rendering
//! - `export` - correction CSV

pub mod cli;
pub mod config;
pub mod export;
pub mod progress;
pub mod report;
pub mod runner;
pub mod telemetry;

pub use cli::{Cli, Command};
pub use config::{ConfigError, Job, PrimeInput, RunConfig};
pub use export::{export_csv, ExportError};
pub use runner::{RunError, RunOutcome, Runner};
