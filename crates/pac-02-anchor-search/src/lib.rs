//! # PAC-02 Anchor Search
//!
//! Enumerates anchors, finds the nearest prime to each one and decides
//! whether Law I holds for it.
//!
//! ## Pipeline
//!
//! ```text
//! PrimeUniverse ──→ ConsecutiveSums ──→ NearestPrimeSearcher ──→ classify() ──→ AnchorSink
//!   (pac-01)          S_n = p_n+p_n+1      S-d, then S+d           k=1 or prime      (pac-03)
//! ```
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): pure, synchronous
//!   - `Primorial`: the 6 / 30 / 210 / 2310 filters
//!   - `Anchor`, `AnchorRange`, `ConsecutiveSums`: S_n enumeration
//!   - `GridAnchor`, `PrimorialGrid`: nearest primorial multiple to a prime q
//!   - `NearestPrimeSearcher`, `SearchOutcome`: capped bidirectional search
//!   - `LawIVerdict`, `classify`: success vs. composite failure
//!   - `Evaluation`, `FailureEvent`: what the sinks consume
//!
//! - **Ports Layer** (`ports/`)
//!   - `AnchorSearchApi`: driving port, implemented by `AnchorEngine`
//!   - `AnchorSink`, `GridSink`, `Mergeable`, `ProgressObserver`: driven ports
//!
//! - **Service Layer** (`service/`)
//!   - `AnchorEngine`: validation + evaluation
//!   - `AnchorScan`: step-wise scan state machine
//!   - partitioned scan across a rayon pool
//!
//! ## Invariants
//!
//! - **INVARIANT-1**: a found outcome is exactly one of success / composite failure
//! - **INVARIANT-2**: equidistant primes record the lower candidate
//! - **INVARIANT-3**: skipped anchors (`k_min == 0`) never reach a failure bucket
//! - **INVARIANT-4**: no membership query exceeds the universe bound

pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use domain::{
    classify, classify_distance, is_clean_distance, Anchor, AnchorRange, ConsecutiveSums,
    Evaluation, FailureEvent, GridAnchor, GridEvaluation, LawIVerdict, NearestPrimeSearcher,
    Primorial, PrimorialGrid, ResidueSignature, SearchOutcome, EXTENDED_SEARCH_CAP,
    GRID_MIN_PRIME, STANDARD_SEARCH_CAP,
};
pub use error::EngineError;
pub use metrics::{ScanMetrics, ScanSnapshot};
pub use ports::{AnchorSearchApi, AnchorSink, GridSink, Mergeable, NoOpProgress, ProgressObserver};
pub use service::{
    default_partitions, AnchorEngine, AnchorScan, PartitionAbort, ScanStep,
    DEFAULT_PROGRESS_INTERVAL,
};
