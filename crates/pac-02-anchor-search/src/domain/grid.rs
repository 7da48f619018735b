//! Primorial-grid anchors: the nearest multiple of a modulus to a prime q.
//!
//! This is a separate anchor definition from S_n. The neighbour prime is q
//! itself and the distance is measured from the grid point, so no search is
//! involved; the Law I classifier is shared.

use serde::{Deserialize, Serialize};

use super::primorial::Primorial;
use super::search::SearchOutcome;

/// Primes at or below this value are excluded from grid runs.
pub const GRID_MIN_PRIME: u64 = 7;

/// Closest multiple of `modulus` to `prime`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridAnchor {
    pub prime: u64,
    pub filter: Primorial,
    pub anchor: u64,
}

impl GridAnchor {
    /// Pick the lower multiple only when it is strictly closer; ties go up.
    pub fn nearest(prime: u64, filter: Primorial) -> Self {
        let modulus = filter.modulus();
        let below = (prime / modulus) * modulus;
        let above = below + modulus;
        let anchor = if prime - below < above - prime {
            below
        } else {
            above
        };
        Self {
            prime,
            filter,
            anchor,
        }
    }

    /// k = |A - q|
    pub fn distance(&self) -> u64 {
        self.anchor.abs_diff(self.prime)
    }

    /// The grid distance expressed as a search outcome with q as neighbour.
    pub fn outcome(&self) -> SearchOutcome {
        SearchOutcome::hit(self.distance(), self.prime)
    }
}

/// Enumerates the primes a grid run tests: every listed prime above
/// [`GRID_MIN_PRIME`], in order.
#[derive(Clone, Debug)]
pub struct PrimorialGrid<'u> {
    primes: std::slice::Iter<'u, u64>,
}

impl<'u> PrimorialGrid<'u> {
    pub fn new(primes: &'u [u64]) -> Self {
        let first = primes.partition_point(|&p| p <= GRID_MIN_PRIME);
        Self {
            primes: primes[first..].iter(),
        }
    }
}

impl Iterator for PrimorialGrid<'_> {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        self.primes.next().copied()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.primes.size_hint()
    }
}

impl ExactSizeIterator for PrimorialGrid<'_> {}
