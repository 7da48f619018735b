//! Prime universe: the ordered listing plus its membership index
//!
//! INVARIANTS:
//! - INVARIANT-1: `primes` is strictly ascending and non-empty
//! - INVARIANT-2: `contains(x)` is exact for `x <= max_prime()`; no false negatives

use std::time::Instant;

use bitvec::prelude::*;
use tracing::info;

use super::sieve::primes_up_to;
use crate::error::UniverseError;
use crate::ports::{MembershipOracle, PrimeSource};

/// Ascending primes with an O(1) membership index.
///
/// Membership for odd values lives in a packed bitset (bit `i` is the value
/// `2i + 1`); even members, normally just `2`, are kept in a short sorted
/// list. A listing of the first 100M primes costs roughly 128 MB of bits.
#[derive(Clone, Debug)]
pub struct PrimeUniverse {
    primes: Vec<u64>,
    odd_bits: BitVec<usize, Lsb0>,
    even_members: Vec<u64>,
}

impl PrimeUniverse {
    /// Build from an ascending listing.
    ///
    /// The listing is not checked for primality: the universe is whatever the
    /// source says it is. Tests rely on this to construct sparse universes.
    pub fn from_ascending(primes: Vec<u64>) -> Result<Self, UniverseError> {
        let max = match primes.last() {
            Some(&max) => max,
            None => return Err(UniverseError::Empty),
        };

        if let Some(index) = primes.windows(2).position(|pair| pair[0] >= pair[1]) {
            return Err(UniverseError::NotAscending {
                index: index + 1,
                previous: primes[index],
                value: primes[index + 1],
            });
        }

        let slots = usize::try_from(max / 2 + 1).map_err(|_| UniverseError::TooLarge { max })?;
        let mut odd_bits = bitvec![usize, Lsb0; 0; slots];
        let mut even_members = Vec::new();
        for &p in &primes {
            if p & 1 == 1 {
                odd_bits.set((p >> 1) as usize, true);
            } else {
                even_members.push(p);
            }
        }

        Ok(Self {
            primes,
            odd_bits,
            even_members,
        })
    }

    /// Universe of every prime `<= limit`, built by sieving.
    pub fn up_to(limit: u64) -> Result<Self, UniverseError> {
        Self::from_ascending(primes_up_to(limit))
    }

    /// Load from any source, logging size and build time.
    pub fn load(source: &dyn PrimeSource) -> Result<Self, UniverseError> {
        let started = Instant::now();
        let primes = source.load()?;
        let universe = Self::from_ascending(primes)?;
        info!(
            source = %source.describe(),
            primes = universe.len(),
            max_prime = universe.max_prime(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Prime universe built"
        );
        Ok(universe)
    }

    /// Number of primes in the listing.
    pub fn len(&self) -> usize {
        self.primes.len()
    }

    /// Always false for a constructed universe.
    pub fn is_empty(&self) -> bool {
        self.primes.is_empty()
    }

    /// The ascending listing.
    pub fn primes(&self) -> &[u64] {
        &self.primes
    }

    /// The `index`-th prime (0-based), if loaded.
    pub fn prime(&self, index: usize) -> Option<u64> {
        self.primes.get(index).copied()
    }

    /// Largest loaded prime; the membership bound.
    pub fn max_prime(&self) -> u64 {
        // INVARIANT-1: never empty
        self.primes.last().copied().unwrap_or(0)
    }

    /// Approximate heap footprint of the membership index in bytes.
    pub fn index_bytes(&self) -> usize {
        self.odd_bits.as_raw_slice().len() * std::mem::size_of::<usize>()
            + self.even_members.len() * std::mem::size_of::<u64>()
    }
}

impl MembershipOracle for PrimeUniverse {
    fn contains(&self, value: u64) -> bool {
        if value > self.max_prime() {
            return false;
        }
        if value & 1 == 1 {
            self.odd_bits[(value >> 1) as usize]
        } else {
            self.even_members.binary_search(&value).is_ok()
        }
    }

    fn upper_bound(&self) -> u64 {
        self.max_prime()
    }
}
