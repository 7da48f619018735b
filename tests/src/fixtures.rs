//! Shared test universes.

use std::io::Write;
use std::path::PathBuf;

use pac_01_prime_universe::{primes_up_to, PrimeUniverse};

/// Sieve bound of the reference universe.
pub const REFERENCE_LIMIT: u64 = 300_000;

/// Anchors `10..10_010` of the reference universe.
pub const REFERENCE_START: usize = 10;
pub const REFERENCE_PAIRS: usize = 10_000;

/// Every prime up to [`REFERENCE_LIMIT`].
pub fn reference_universe() -> PrimeUniverse {
    PrimeUniverse::up_to(REFERENCE_LIMIT).expect("sieve universe")
}

/// Real primes below 1000 with 139..=181 removed, then 10007.
///
/// S_20 = 152 and S_21 = 162 both land on q = 137 at composite distances.
/// S_20 is corrected by S_19 = 144 at radius 1; S_21 is not correctable
/// within radius 1.
pub fn gapped_listing() -> Vec<u64> {
    let mut primes: Vec<u64> = primes_up_to(1000)
        .into_iter()
        .filter(|p| !(139..=181).contains(p))
        .collect();
    primes.push(10_007);
    primes
}

/// Write `primes` as a one-per-line listing and return its path.
pub fn write_listing(dir: &tempfile::TempDir, name: &str, primes: &[u64]) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).expect("create listing");
    for p in primes {
        writeln!(file, "{p}").expect("write listing");
    }
    path
}
