//! Handler invocation context.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::logging::LogContext;

/// Context for one handler invocation: a short unique id for log
/// correlation and the time the event was received.
#[derive(Debug, Clone)]
pub struct EventContext {
    pub event_id: String,
    pub handler: &'static str,
    pub received_at: DateTime<Utc>,
}

impl EventContext {
    pub fn new(handler: &'static str) -> Self {
        Self {
            event_id: format!("evt-{}", &Uuid::new_v4().to_string()[..8]),
            handler,
            received_at: Utc::now(),
        }
    }

    pub fn log_context(&self) -> LogContext {
        LogContext::new(&self.event_id, self.handler)
    }
}
