//! Error types for the prime universe

use thiserror::Error;

/// Errors raised while building or querying a prime universe
#[derive(Debug, Error)]
pub enum UniverseError {
    #[error("Prime listing is empty")]
    Empty,

    #[error("Primes must be strictly ascending: entry {index} is {value} after {previous}")]
    NotAscending {
        index: usize,
        previous: u64,
        value: u64,
    },

    #[error("Line {line} is not an unsigned integer: {content:?}")]
    Parse { line: usize, content: String },

    #[error("Largest prime {max} cannot be indexed on this platform")]
    TooLarge { max: u64 },

    #[error("Membership query {value} exceeds the universe bound {bound}")]
    OutOfRange { value: u64, bound: u64 },

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
