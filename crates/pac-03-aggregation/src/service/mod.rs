//! Service Layer - pipeline selection
//!
//! The runner picks a [`PipelineKind`] at run time; [`Pipeline`] wraps the
//! matching domain sink so one scan loop drives all of them.

pub mod pipeline;

pub use pipeline::{Pipeline, PipelineKind, PipelineReport, PipelineSettings};
