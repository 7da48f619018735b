//! In-memory prime source backed by the sieve.

use crate::domain::primes_up_to;
use crate::error::UniverseError;
use crate::ports::PrimeSource;

/// Generates every prime up to `limit`.
#[derive(Clone, Copy, Debug)]
pub struct SievePrimeSource {
    limit: u64,
}

impl SievePrimeSource {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }
}

impl PrimeSource for SievePrimeSource {
    fn describe(&self) -> String {
        format!("sieve(<= {})", self.limit)
    }

    fn load(&self) -> Result<Vec<u64>, UniverseError> {
        let primes = primes_up_to(self.limit);
        if primes.is_empty() {
            return Err(UniverseError::Empty);
        }
        Ok(primes)
    }
}
