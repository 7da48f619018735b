//! Outbound Ports (Driven Ports)
//!
//! Sources of the raw, ascending prime listing.

use crate::error::UniverseError;

/// Supplies an ascending prime listing.
pub trait PrimeSource {
    /// Human-readable origin, used in log lines.
    fn describe(&self) -> String;

    /// Produce the listing. Ordering is validated by the universe, not here.
    fn load(&self) -> Result<Vec<u64>, UniverseError>;
}
