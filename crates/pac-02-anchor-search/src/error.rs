//! Error types for the anchor search engine
//!
//! Every variant is fatal for the run. Per-anchor skips are ordinary
//! `SearchOutcome` values and never appear here.

use thiserror::Error;

/// Run-aborting failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("Insufficient prime data: lookups reach {required} but the universe ends at {available}")]
    InsufficientData { required: u64, available: u64 },

    #[error("Anchors need {required} primes but the universe holds {available}")]
    IndexOutOfRange { required: usize, available: usize },

    #[error("Anchor range starts at {start} but {lookback} earlier anchors are read")]
    InsufficientLookback { start: usize, lookback: usize },

    #[error("Anchor range {start}..{end} is empty")]
    EmptyRange { start: usize, end: usize },

    #[error("Search cap must be at least 1")]
    InvalidSearchCap,

    #[error(
        "Law III falsified at n={index}: S_n={anchor}, q={neighbor_prime}, k={k_min} \
         has no clean correction within radius {max_radius}"
    )]
    CorrectionExhausted {
        index: usize,
        anchor: u64,
        neighbor_prime: u64,
        k_min: u64,
        max_radius: usize,
    },
}

impl EngineError {
    /// True for the falsification path rather than a data/configuration problem.
    pub fn is_falsification(&self) -> bool {
        matches!(self, EngineError::CorrectionExhausted { .. })
    }

    /// Anchor index the error is attributed to, if any.
    pub fn anchor_index(&self) -> Option<usize> {
        match self {
            EngineError::CorrectionExhausted { index, .. } => Some(*index),
            _ => None,
        }
    }
}
