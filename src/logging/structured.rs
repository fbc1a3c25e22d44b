//! Structured logging utilities.
//!
//! Provides context-aware logging with the triggering event and the
//! entity being processed included in every log message.

use std::fmt;

/// Logging context for one handler invocation.
#[derive(Debug, Clone)]
pub struct LogContext {
    pub event_id: String,
    pub handler: String,
    pub entity_id: Option<String>,
}

impl LogContext {
    pub fn new(event_id: &str, handler: &str) -> Self {
        Self {
            event_id: event_id.to_string(),
            handler: handler.to_string(),
            entity_id: None,
        }
    }

    pub fn with_entity(&self, entity_id: &str) -> Self {
        Self {
            event_id: self.event_id.clone(),
            handler: self.handler.clone(),
            entity_id: Some(entity_id.to_string()),
        }
    }
}

impl fmt::Display for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.entity_id {
            Some(id) => write!(
                f,
                "[event={}] [handler={}] [id={}]",
                self.event_id, self.handler, id
            ),
            None => write!(f, "[event={}] [handler={}]", self.event_id, self.handler),
        }
    }
}
