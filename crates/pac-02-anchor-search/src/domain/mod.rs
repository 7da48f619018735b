//! Domain Layer - Pure search and classification logic
//!
//! RULES:
//! - No I/O operations
//! - No shared mutable state
//! - Membership only through `MembershipOracle`

pub mod anchor;
pub mod evaluation;
pub mod grid;
pub mod primorial;
pub mod search;
pub mod verdict;

pub use anchor::{Anchor, AnchorRange, ConsecutiveSums};
pub use evaluation::{Evaluation, FailureEvent, GridEvaluation};
pub use grid::{GridAnchor, PrimorialGrid, GRID_MIN_PRIME};
pub use primorial::{Primorial, ResidueSignature};
pub use search::{NearestPrimeSearcher, SearchOutcome, EXTENDED_SEARCH_CAP, STANDARD_SEARCH_CAP};
pub use verdict::{classify, classify_distance, is_clean_distance, LawIVerdict};
