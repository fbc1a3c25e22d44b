//! CivicWatch Core - Event-driven congestion/alerting pipeline
//!
//! This crate implements the serverless core of a civic-reporting
//! system: the reactions to report creation, report status changes, and
//! parking-occupancy changes that derive a per-cell congestion level,
//! fan out push notifications to role-based audiences, and decay stale
//! state over time. The implementation prioritizes:
//!
//! 1. **Re-runnability** - handlers tolerate at-least-once delivery
//! 2. **Logging** - every decision point logged with full context
//! 3. **Narrow seams** - stores and push delivery behind small traits
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `pipeline` - handler entry points (the composition root)
//! - `validation` - structural/semantic report checks
//! - `aggregation` - recency/proximity scan and classification
//! - `congestion` - bucket state upserts and the decay sweep
//! - `dispatch` - role-based push fan-out with token pruning
//! - `geo` - bucket index and great-circle distance (pure functions)
//! - `storage` - record models, store traits, in-memory stores
//! - `logging` - structured logging with invocation context
//!
//! The embedding adapter owns the real database and push clients and
//! wires each handler to the platform's event source; retrying a
//! handler that returned an error is the platform's job.

pub mod aggregation;
pub mod config;
pub mod congestion;
pub mod dispatch;
pub mod error;
pub mod geo;
pub mod logging;
pub mod pipeline;
pub mod storage;
pub mod validation;

pub use config::PipelineConfig;
pub use error::{PipelineError, PushError, StoreError};
pub use pipeline::Pipeline;

/// Initialize the module-level logger.
///
/// Safe to call from every handler invocation; only the first call
/// installs the logger.
pub fn init_logger() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp_millis()
        .try_init();
}
