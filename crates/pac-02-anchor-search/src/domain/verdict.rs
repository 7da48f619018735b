//! Law I classification
//!
//! Law I holds for an anchor when its nearest-prime distance is 1 or prime.
//! A composite distance is a Law I failure. Skipped searches are neither.

use pac_01_prime_universe::MembershipOracle;
use serde::{Deserialize, Serialize};

use super::search::SearchOutcome;

/// Outcome of classifying one search.
///
/// INVARIANT-1: `is_success && is_composite_failure` never holds; for a found
/// outcome exactly one is set, for a skipped one neither.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LawIVerdict {
    pub is_success: bool,
    pub is_composite_failure: bool,
}

impl LawIVerdict {
    pub const SUCCESS: Self = Self {
        is_success: true,
        is_composite_failure: false,
    };

    pub const FAILURE: Self = Self {
        is_success: false,
        is_composite_failure: true,
    };

    pub const SKIPPED: Self = Self {
        is_success: false,
        is_composite_failure: false,
    };

    pub fn is_skipped(&self) -> bool {
        !self.is_success && !self.is_composite_failure
    }
}

/// Is `k` a clean distance: 1, or a member of the oracle?
pub fn is_clean_distance<O: MembershipOracle + ?Sized>(k: u64, oracle: &O) -> bool {
    k == 1 || (k >= 2 && oracle.contains(k))
}

/// Classify a raw distance that is known to exist.
pub fn classify_distance<O: MembershipOracle + ?Sized>(k: u64, oracle: &O) -> LawIVerdict {
    if k == 0 {
        return LawIVerdict::SKIPPED;
    }
    if is_clean_distance(k, oracle) {
        LawIVerdict::SUCCESS
    } else {
        LawIVerdict::FAILURE
    }
}

/// Classify a search outcome.
pub fn classify<O: MembershipOracle + ?Sized>(outcome: &SearchOutcome, oracle: &O) -> LawIVerdict {
    if !outcome.found {
        return LawIVerdict::SKIPPED;
    }
    classify_distance(outcome.k_min, oracle)
}
