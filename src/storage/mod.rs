//! Storage module.
//!
//! Record models plus the narrow durable/fast store traits the handlers
//! are written against. Real database clients live in the embedding
//! adapter; `memory` provides in-process implementations for tests and
//! self-contained deployments.

pub mod durable;
pub mod fast;
pub mod memory;
pub mod models;

pub use durable::DurableStore;
pub use fast::FastStore;
pub use memory::{MemoryDurableStore, MemoryFastStore};
pub use models::*;
