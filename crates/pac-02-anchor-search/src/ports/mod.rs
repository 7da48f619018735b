//! Ports Layer
//!
//! - Driving Port (inbound) - what runners call on the engine
//! - Driven Ports (outbound) - where evaluations and progress go

pub mod inbound;
pub mod outbound;

pub use inbound::AnchorSearchApi;
pub use outbound::{AnchorSink, GridSink, Mergeable, NoOpProgress, ProgressObserver};
