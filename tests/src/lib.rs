//! # Primorial Anchor Workbench Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/
//! │   ├── fixtures.rs       # Shared universes and listings
//! │   └── integration/
//! │       ├── flows.rs      # Full pipelines over real primes
//! │       └── scenarios.rs  # Hand-built universes with known answers
//! └── benches/
//!     └── engine_benchmarks.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p pac-tests
//! cargo test -p pac-tests integration::scenarios::
//!
//! # Benchmarks
//! cargo bench -p pac-tests
//! ```

pub mod fixtures;
pub mod integration;
