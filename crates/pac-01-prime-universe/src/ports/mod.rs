//! Ports Layer
//!
//! - Driving Port (inbound) - membership queries used by the search engine
//! - Driven Port (outbound) - where the raw prime listing comes from

pub mod inbound;
pub mod outbound;

pub use inbound::MembershipOracle;
pub use outbound::PrimeSource;
