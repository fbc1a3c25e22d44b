//! Dispatch module.
//!
//! Push payload shapes, the message catalog, and role-based fan-out
//! with stale-token pruning.

pub mod messages;
pub mod notifier;
pub mod push;

pub use notifier::{send_to_roles, send_to_user, DispatchReport};
pub use push::{Notification, PushClient, PushMessage, SendOutcome};
