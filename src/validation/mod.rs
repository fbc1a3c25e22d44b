//! Validation module.
//!
//! Structural and semantic checks applied exactly once to each newly
//! created report.

pub mod report;

pub use report::{validate_report, ValidationOutcome};
