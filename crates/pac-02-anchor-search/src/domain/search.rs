//! Nearest-prime search around an anchor value
//!
//! INVARIANTS:
//! - INVARIANT-2: at each distance `S - d` is tested before `S + d`; an
//!   equidistant pair always records the lower prime
//! - the cap is inclusive: distances `1..=cap` are tested

use pac_01_prime_universe::MembershipOracle;
use serde::{Deserialize, Serialize};

/// Cap used by most analyses.
pub const STANDARD_SEARCH_CAP: u64 = 2000;

/// Cap for rarer anchors (mod-2310 detector, correction-radius run).
pub const EXTENDED_SEARCH_CAP: u64 = 3000;

/// Result of one nearest-prime search.
///
/// `k_min == 0` with `found == false` marks a skipped, inconclusive anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub k_min: u64,
    pub neighbor_prime: u64,
    pub found: bool,
}

impl SearchOutcome {
    pub fn hit(k_min: u64, neighbor_prime: u64) -> Self {
        Self {
            k_min,
            neighbor_prime,
            found: true,
        }
    }

    pub fn not_found() -> Self {
        Self {
            k_min: 0,
            neighbor_prime: 0,
            found: false,
        }
    }

    pub fn is_skipped(&self) -> bool {
        !self.found
    }
}

/// Bidirectional, capped search for the closest oracle member.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NearestPrimeSearcher {
    cap: u64,
}

impl Default for NearestPrimeSearcher {
    fn default() -> Self {
        Self::new(STANDARD_SEARCH_CAP)
    }
}

impl NearestPrimeSearcher {
    pub fn new(cap: u64) -> Self {
        Self { cap }
    }

    pub fn cap(&self) -> u64 {
        self.cap
    }

    /// Largest value any search around `anchor` may query.
    pub fn reach(&self, anchor: u64) -> u64 {
        anchor.saturating_add(self.cap)
    }

    /// Find the minimal distance from `anchor` to a member of `oracle`.
    ///
    /// Callers must ensure `reach(anchor)` is within the oracle bound.
    pub fn search<O: MembershipOracle + ?Sized>(&self, oracle: &O, anchor: u64) -> SearchOutcome {
        for d in 1..=self.cap {
            // Lower candidates below 2 are never prime.
            if let Some(lower) = anchor.checked_sub(d) {
                if lower >= 2 && oracle.contains(lower) {
                    return SearchOutcome::hit(d, lower);
                }
            }
            let upper = anchor + d;
            if oracle.contains(upper) {
                return SearchOutcome::hit(d, upper);
            }
        }
        SearchOutcome::not_found()
    }
}
