//! Utilities Module
//!
//! Execution metrics.

mod metrics;

pub use metrics::*;
