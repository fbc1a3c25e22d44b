//! Push client interface.
//!
//! The wire shape matches the hosted push service: a notification block
//! plus a string-keyed data payload, sent to many tokens (multicast) or
//! one. The real client lives in the embedding adapter; the core only
//! needs per-token outcomes back.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::PushError;

/// User-visible notification content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

/// A push payload: notification content plus context data for the
/// client to route taps (`data.type` plus context ids).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushMessage {
    pub notification: Notification,
    pub data: HashMap<String, String>,
}

impl PushMessage {
    pub fn new(title: &str, body: &str) -> Self {
        Self {
            notification: Notification {
                title: title.to_string(),
                body: body.to_string(),
            },
            data: HashMap::new(),
        }
    }

    pub fn with_data(mut self, key: &str, value: &str) -> Self {
        self.data.insert(key.to_string(), value.to_string());
        self
    }
}

/// Outcome of delivery to a single token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Delivered,
    /// The push service reports the token invalid or unregistered.
    /// The token is permanently dead and should be pruned.
    InvalidToken,
    /// Any other per-token failure. May succeed on a later send, so the
    /// token is kept.
    Transient(String),
}

/// Push delivery client.
///
/// `Err` means the service itself was unreachable and the whole handler
/// should be retried; per-token failures come back inside `Ok`.
pub trait PushClient: Send + Sync {
    /// Send one message to many tokens. The returned outcomes are
    /// positionally aligned with `tokens`.
    fn send_multicast(
        &self,
        message: &PushMessage,
        tokens: &[String],
    ) -> Result<Vec<SendOutcome>, PushError>;

    /// Send one message to a single token.
    fn send_single(&self, message: &PushMessage, token: &str) -> Result<SendOutcome, PushError>;
}
