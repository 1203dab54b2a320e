//! Analysis modules.
//!
//! Aggregation of parsed files, summary statistics and histogram binning.

pub mod aggregator;
pub mod histogram;
pub mod statistics;

pub use aggregator::*;
pub use histogram::Histogram;
pub use statistics::compute_statistics;
