//! Durable store interface.
//!
//! The primary document database holding reports, users, and parking
//! master records. The core consumes it through this narrow trait; the
//! embedding adapter owns the real database client.

use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::storage::models::{ParkingRecord, Report, ReportStatus, Role, User};

/// Read/write surface of the durable store, restricted to exactly what
/// the handlers need.
pub trait DurableStore: Send + Sync {
    fn report(&self, id: &str) -> Result<Option<Report>, StoreError>;

    /// The single validation write: status, reasons, validation stamp.
    /// Safe to re-apply with the same arguments.
    fn write_report_validation(
        &self,
        id: &str,
        status: ReportStatus,
        reasons: &[String],
        validated_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// All reports created at or after the cutoff. Full-window scan;
    /// acceptable at city-scale volumes.
    fn reports_created_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<Report>, StoreError>;

    fn user(&self, id: &str) -> Result<Option<User>, StoreError>;

    /// All users whose role is in the target set.
    fn users_with_roles(&self, roles: &[Role]) -> Result<Vec<User>, StoreError>;

    /// Clear the push token of each listed user in one batched update.
    fn clear_push_tokens(&self, user_ids: &[String]) -> Result<(), StoreError>;

    fn parking(&self, id: &str) -> Result<Option<ParkingRecord>, StoreError>;
}
