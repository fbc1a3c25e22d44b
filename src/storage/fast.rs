//! Fast store interface.
//!
//! The low-latency mirror read by the mobile client in real time:
//! per-bucket congestion state under `traffic/{bucketId}` and live
//! parking occupancy under `parking_live/{parkingId}`.

use crate::error::StoreError;
use crate::storage::models::{CongestionBucket, CongestionLevel, ParkingLiveRecord};

pub trait FastStore: Send + Sync {
    fn bucket(&self, bucket_id: &str) -> Result<Option<CongestionBucket>, StoreError>;

    fn upsert_bucket(&self, bucket: &CongestionBucket) -> Result<(), StoreError>;

    /// Persist only the level field. Used by the decay sweep, which must
    /// not advance `last_updated`.
    fn set_bucket_level(&self, bucket_id: &str, level: CongestionLevel)
        -> Result<(), StoreError>;

    /// Snapshot of every bucket, for the sweep.
    fn all_buckets(&self) -> Result<Vec<CongestionBucket>, StoreError>;

    fn parking_live(&self, parking_id: &str) -> Result<Option<ParkingLiveRecord>, StoreError>;

    fn upsert_parking_live(&self, record: &ParkingLiveRecord) -> Result<(), StoreError>;

    fn delete_parking_live(&self, parking_id: &str) -> Result<(), StoreError>;
}
