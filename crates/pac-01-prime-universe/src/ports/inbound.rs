//! Inbound Ports (Driving Ports)
//!
//! The membership contract the nearest-prime searcher and the Law I
//! classifier are written against.

use crate::error::UniverseError;

/// Exact set-membership over a bounded universe of integers.
///
/// Callers must not query beyond [`MembershipOracle::upper_bound`]; the
/// unchecked [`MembershipOracle::contains`] answers `false` there, which
/// would be a false negative. Scans validate their lookup range up front.
pub trait MembershipOracle: Send + Sync {
    /// Is `value` a known prime?
    fn contains(&self, value: u64) -> bool;

    /// Largest value for which `contains` is exact.
    fn upper_bound(&self) -> u64;

    /// Checked membership: out-of-range queries are errors, not misses.
    fn try_contains(&self, value: u64) -> Result<bool, UniverseError> {
        if value > self.upper_bound() {
            return Err(UniverseError::OutOfRange {
                value,
                bound: self.upper_bound(),
            });
        }
        Ok(self.contains(value))
    }

    /// Whether every value in `[0, value]` can be answered exactly.
    fn covers(&self, value: u64) -> bool {
        value <= self.upper_bound()
    }
}
