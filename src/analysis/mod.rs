//! Matchup analysis.
//!
//! Combines fetched type records into grouped damage multipliers.

pub mod aggregator;

pub use aggregator::*;
