//! Domain Layer - Pure data structures
//!
//! RULES:
//! - No I/O operations
//! - Immutable once built

pub mod sieve;
pub mod universe;

pub use sieve::primes_up_to;
pub use universe::PrimeUniverse;
