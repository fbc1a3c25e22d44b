//! Error taxonomy for the pipeline.
//!
//! Only transient infrastructure failures surface as errors: the hosting
//! platform re-invokes a handler that returns one. Everything else
//! (rejected reports, missing referenced records, stale push tokens) is
//! resolved to a normal return so the platform does not retry conditions
//! that can never succeed.

use thiserror::Error;

/// A store read or write could not be completed.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// The push service itself could not be reached.
///
/// Per-token delivery failures are not errors; they are reported in the
/// dispatch outcome instead.
#[derive(Debug, Error)]
pub enum PushError {
    #[error("push service unreachable: {0}")]
    Unreachable(String),
}

/// Handler-level error. Returning one of these signals the platform to
/// retry the whole event.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Push(#[from] PushError),
}
