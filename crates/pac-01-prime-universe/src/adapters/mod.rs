//! Adapters Layer - prime listing sources

pub mod sieve_source;
pub mod text_file;

pub use sieve_source::SievePrimeSource;
pub use text_file::{parse_listing, TextFilePrimeSource};
