//! Service Layer - scan orchestration
//!
//! - `AnchorEngine`: range validation and per-anchor evaluation
//! - `AnchorScan`: polled state machine over one range
//! - partitioned scans across the rayon pool

pub mod engine;
pub mod partition;
pub mod scan;

pub use engine::AnchorEngine;
pub use partition::{default_partitions, PartitionAbort};
pub use scan::{AnchorScan, ScanStep, DEFAULT_PROGRESS_INTERVAL};
