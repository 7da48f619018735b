//! Inbound Ports (Driving Ports)

use crate::domain::{Anchor, Evaluation, GridEvaluation, Primorial, SearchOutcome};
use crate::error::EngineError;

/// Point queries against the engine.
///
/// Every call is bound-checked against the universe; a query that would
/// read past the largest loaded prime is an error, never a miss.
pub trait AnchorSearchApi {
    /// Random access to S_n.
    fn anchor_at(&self, index: usize) -> Result<Anchor, EngineError>;

    /// Nearest-prime search around an arbitrary value.
    fn search_value(&self, value: u64) -> Result<SearchOutcome, EngineError>;

    /// Search and classify S_n.
    fn evaluate_index(&self, index: usize) -> Result<Evaluation, EngineError>;

    /// Classify the grid anchor of `prime` under `filter`.
    fn evaluate_grid(&self, prime: u64, filter: Primorial) -> Result<GridEvaluation, EngineError>;
}
