//! Aggregation module.
//!
//! Recency/proximity scan and congestion classification.

pub mod proximity;

pub use proximity::{classify, count_recent_nearby};
