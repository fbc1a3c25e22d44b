//! Logging module.
//!
//! Structured logging with per-invocation context.

pub mod structured;

pub use structured::LogContext;
