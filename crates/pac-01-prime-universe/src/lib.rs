//! # PAC-01 Prime Universe
//!
//! The ordered prime list every anchor search runs against, plus the
//! membership oracle derived from it.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): Pure data, no I/O
//!   - `PrimeUniverse`: ascending primes + packed membership bitset
//!   - `sieve`: Eratosthenes sieve for synthetic universes
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `MembershipOracle`: Driving port consumed by the search engine
//!   - `PrimeSource`: Driven port supplying the raw listing
//!
//! - **Adapters Layer** (`adapters/`): Prime sources
//!   - `TextFilePrimeSource`: one integer per line, ascending
//!   - `SievePrimeSource`: in-memory sieve up to a limit
//!
//! ## Invariants
//!
//! - **INVARIANT-1**: primes are strictly ascending
//! - **INVARIANT-2**: `contains(x)` is exact for every `x <= max_prime()`
//!
//! ## Usage Example
//!
//! ```ignore
//! use pac_01_prime_universe::{MembershipOracle, PrimeUniverse};
//!
//! let universe = PrimeUniverse::up_to(1_000)?;
//! assert!(universe.contains(997));
//! assert!(!universe.contains(999));
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;

// Re-exports for convenience
pub use adapters::{SievePrimeSource, TextFilePrimeSource};
pub use domain::{primes_up_to, PrimeUniverse};
pub use error::UniverseError;
pub use ports::{MembershipOracle, PrimeSource};
