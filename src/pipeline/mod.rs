//! Pipeline orchestration module.
//!
//! The composition root: handler entry points that wire validation,
//! aggregation, congestion state, and dispatch together, plus the
//! per-invocation event context.

pub mod context;
pub mod handlers;

pub use context::EventContext;
pub use handlers::Pipeline;
