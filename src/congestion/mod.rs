//! Congestion module.
//!
//! Owns the per-bucket congestion state in the fast store: fresh
//! classification writes and the scheduled decay sweep.

pub mod state;

pub use state::{decay_sweep, update_bucket, SweepSummary};
