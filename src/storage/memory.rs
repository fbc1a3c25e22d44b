//! In-memory store implementations.
//!
//! Used by the test suite and by embedders that want the pipeline
//! without external infrastructure. Plain keyed maps behind RwLocks;
//! writes are independent upserts, matching the no-transaction model
//! the handlers are written against.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::error::StoreError;
use crate::storage::durable::DurableStore;
use crate::storage::fast::FastStore;
use crate::storage::models::{
    CongestionBucket, CongestionLevel, ParkingLiveRecord, ParkingRecord, Report, ReportStatus,
    Role, User,
};

/// In-memory durable store (reports, users, parking masters).
#[derive(Debug, Default)]
pub struct MemoryDurableStore {
    reports: RwLock<HashMap<String, Report>>,
    users: RwLock<HashMap<String, User>>,
    parking: RwLock<HashMap<String, ParkingRecord>>,
}

impl MemoryDurableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_report(&self, report: Report) {
        self.reports.write().insert(report.id.clone(), report);
    }

    pub fn insert_user(&self, user: User) {
        self.users.write().insert(user.id.clone(), user);
    }

    pub fn insert_parking(&self, record: ParkingRecord) {
        self.parking.write().insert(record.id.clone(), record);
    }
}

impl DurableStore for MemoryDurableStore {
    fn report(&self, id: &str) -> Result<Option<Report>, StoreError> {
        Ok(self.reports.read().get(id).cloned())
    }

    fn write_report_validation(
        &self,
        id: &str,
        status: ReportStatus,
        reasons: &[String],
        validated_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut reports = self.reports.write();
        if let Some(report) = reports.get_mut(id) {
            report.status = Some(status);
            report.validation_reasons = reasons.to_vec();
            report.validated_at = Some(validated_at);
        }
        Ok(())
    }

    fn reports_created_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<Report>, StoreError> {
        Ok(self
            .reports
            .read()
            .values()
            .filter(|r| r.created_at >= cutoff)
            .cloned()
            .collect())
    }

    fn user(&self, id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().get(id).cloned())
    }

    fn users_with_roles(&self, roles: &[Role]) -> Result<Vec<User>, StoreError> {
        Ok(self
            .users
            .read()
            .values()
            .filter(|u| roles.contains(&u.role))
            .cloned()
            .collect())
    }

    fn clear_push_tokens(&self, user_ids: &[String]) -> Result<(), StoreError> {
        let mut users = self.users.write();
        for id in user_ids {
            if let Some(user) = users.get_mut(id) {
                user.push_token = None;
            }
        }
        Ok(())
    }

    fn parking(&self, id: &str) -> Result<Option<ParkingRecord>, StoreError> {
        Ok(self.parking.read().get(id).cloned())
    }
}

/// In-memory fast store (congestion buckets, live parking mirror).
#[derive(Debug, Default)]
pub struct MemoryFastStore {
    buckets: RwLock<HashMap<String, CongestionBucket>>,
    parking_live: RwLock<HashMap<String, ParkingLiveRecord>>,
}

impl MemoryFastStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FastStore for MemoryFastStore {
    fn bucket(&self, bucket_id: &str) -> Result<Option<CongestionBucket>, StoreError> {
        Ok(self.buckets.read().get(bucket_id).cloned())
    }

    fn upsert_bucket(&self, bucket: &CongestionBucket) -> Result<(), StoreError> {
        self.buckets
            .write()
            .insert(bucket.bucket_id.clone(), bucket.clone());
        Ok(())
    }

    fn set_bucket_level(
        &self,
        bucket_id: &str,
        level: CongestionLevel,
    ) -> Result<(), StoreError> {
        if let Some(bucket) = self.buckets.write().get_mut(bucket_id) {
            bucket.level = level;
        }
        Ok(())
    }

    fn all_buckets(&self) -> Result<Vec<CongestionBucket>, StoreError> {
        Ok(self.buckets.read().values().cloned().collect())
    }

    fn parking_live(&self, parking_id: &str) -> Result<Option<ParkingLiveRecord>, StoreError> {
        Ok(self.parking_live.read().get(parking_id).cloned())
    }

    fn upsert_parking_live(&self, record: &ParkingLiveRecord) -> Result<(), StoreError> {
        self.parking_live
            .write()
            .insert(record.parking_id.clone(), record.clone());
        Ok(())
    }

    fn delete_parking_live(&self, parking_id: &str) -> Result<(), StoreError> {
        self.parking_live.write().remove(parking_id);
        Ok(())
    }
}
