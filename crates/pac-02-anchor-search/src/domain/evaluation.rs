//! What a scan hands to its sink for every anchor.

use serde::{Deserialize, Serialize};

use super::anchor::Anchor;
use super::grid::GridAnchor;
use super::search::SearchOutcome;
use super::verdict::LawIVerdict;

/// One anchor, searched and classified.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub anchor: Anchor,
    pub outcome: SearchOutcome,
    pub verdict: LawIVerdict,
}

impl Evaluation {
    /// The failure event, for composite failures only.
    pub fn failure(&self) -> Option<FailureEvent> {
        if !self.verdict.is_composite_failure {
            return None;
        }
        Some(FailureEvent {
            index: self.anchor.index,
            anchor: self.anchor.value(),
            neighbor_prime: self.outcome.neighbor_prime,
            k_min: self.outcome.k_min,
            gap: self.anchor.gap(),
        })
    }
}

/// A Law I failure: the nearest prime sits at a composite distance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureEvent {
    /// n
    pub index: usize,
    /// S_n
    pub anchor: u64,
    /// q, the recorded nearest prime
    pub neighbor_prime: u64,
    /// composite k
    pub k_min: u64,
    /// g_n = p_{n+1} - p_n
    pub gap: u64,
}

/// A grid anchor classified by the Law I rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridEvaluation {
    pub grid: GridAnchor,
    pub verdict: LawIVerdict,
}
