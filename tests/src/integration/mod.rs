//! Integration tests across the universe, engine, aggregation and runtime crates.

pub mod flows;
pub mod scenarios;
