//! Congestion state operations.
//!
//! Upserts per-bucket congestion levels into the fast store and runs
//! the scheduled decay sweep. Each bucket is written independently;
//! there is no cross-bucket atomicity and last-write-wins is accepted
//! for near-simultaneous classifications of the same cell.

use chrono::{DateTime, Duration, Utc};

use crate::config::PipelineConfig;
use crate::dispatch::messages::congestion_alert;
use crate::dispatch::{send_to_roles, PushClient};
use crate::error::{PipelineError, StoreError};
use crate::geo::bucket_for;
use crate::logging::LogContext;
use crate::storage::models::{CongestionBucket, CongestionLevel, Role};
use crate::storage::{DurableStore, FastStore};

/// Audience for heavy-traffic alerts.
const CONGESTION_AUDIENCE: [Role; 2] = [Role::TrafficPolice, Role::Citizen];

/// Upsert the bucket covering `(lat, lng)` with a fresh classification.
///
/// Always advances `last_updated`. A HIGH result fans out the standard
/// heavy-traffic alert; repeating the call with the same level simply
/// re-stamps the bucket (and may re-send the alert — an accepted
/// duplicate under at-least-once retry).
pub fn update_bucket(
    durable: &dyn DurableStore,
    fast: &dyn FastStore,
    push: &dyn PushClient,
    cfg: &PipelineConfig,
    lat: f64,
    lng: f64,
    level: CongestionLevel,
    now: DateTime<Utc>,
    ctx: &LogContext,
) -> Result<CongestionBucket, PipelineError> {
    let cell = bucket_for(lat, lng, cfg.bucket_precision);
    let record = CongestionBucket {
        bucket_id: cell.id.clone(),
        level,
        last_updated: now,
        center_lat: cell.center_lat,
        center_lng: cell.center_lng,
    };

    fast.upsert_bucket(&record)?;
    log::info!(
        "{} BUCKET_UPDATED bucket={} level={}",
        ctx,
        record.bucket_id,
        level.as_str()
    );

    if level == CongestionLevel::High {
        send_to_roles(durable, push, &CONGESTION_AUDIENCE, &congestion_alert(&cell.id), ctx)?;
    }

    Ok(record)
}

/// Counts from one decay sweep.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SweepSummary {
    pub examined: usize,
    pub decayed: usize,
    pub failed: usize,
}

/// Decay every stale bucket one rank toward LOW.
///
/// A bucket is stale when its age strictly exceeds the staleness
/// window. The write touches only the level field: `last_updated` is
/// deliberately left alone, so a bucket that stays quiet keeps cooling
/// one rank per sweep until it reaches LOW. Best-effort batch: a write
/// failure on one bucket is logged and the sweep moves on.
pub fn decay_sweep(
    fast: &dyn FastStore,
    cfg: &PipelineConfig,
    now: DateTime<Utc>,
    ctx: &LogContext,
) -> Result<SweepSummary, StoreError> {
    let staleness = Duration::minutes(cfg.congestion_decay_minutes);
    let buckets = fast.all_buckets()?;

    let mut summary = SweepSummary {
        examined: buckets.len(),
        ..SweepSummary::default()
    };

    for bucket in buckets {
        if now - bucket.last_updated <= staleness {
            continue;
        }
        let next = bucket.level.step_down();
        if next == bucket.level {
            continue;
        }

        match fast.set_bucket_level(&bucket.bucket_id, next) {
            Ok(()) => {
                summary.decayed += 1;
                log::info!(
                    "{} BUCKET_DECAYED bucket={} from={} to={}",
                    ctx,
                    bucket.bucket_id,
                    bucket.level.as_str(),
                    next.as_str()
                );
            }
            Err(e) => {
                summary.failed += 1;
                log::warn!(
                    "{} BUCKET_DECAY_FAILED bucket={} error={}",
                    ctx,
                    bucket.bucket_id,
                    e
                );
            }
        }
    }

    log::info!(
        "{} DECAY_SWEEP_COMPLETE examined={} decayed={} failed={}",
        ctx,
        summary.examined,
        summary.decayed,
        summary.failed
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PushError;
    use crate::dispatch::{PushMessage, SendOutcome};
    use crate::storage::models::ParkingLiveRecord;
    use crate::storage::{MemoryDurableStore, MemoryFastStore};
    use parking_lot::Mutex;

    struct NullPush;

    impl PushClient for NullPush {
        fn send_multicast(
            &self,
            _message: &PushMessage,
            tokens: &[String],
        ) -> Result<Vec<SendOutcome>, PushError> {
            Ok(tokens.iter().map(|_| SendOutcome::Delivered).collect())
        }

        fn send_single(
            &self,
            _message: &PushMessage,
            _token: &str,
        ) -> Result<SendOutcome, PushError> {
            Ok(SendOutcome::Delivered)
        }
    }

    /// Fast store that refuses level writes for one bucket id.
    struct FlakyFastStore {
        inner: MemoryFastStore,
        poison: String,
        failures: Mutex<usize>,
    }

    impl FastStore for FlakyFastStore {
        fn bucket(&self, bucket_id: &str) -> Result<Option<CongestionBucket>, StoreError> {
            self.inner.bucket(bucket_id)
        }

        fn upsert_bucket(&self, bucket: &CongestionBucket) -> Result<(), StoreError> {
            self.inner.upsert_bucket(bucket)
        }

        fn set_bucket_level(
            &self,
            bucket_id: &str,
            level: CongestionLevel,
        ) -> Result<(), StoreError> {
            if bucket_id == self.poison {
                *self.failures.lock() += 1;
                return Err(StoreError::Unavailable("scripted failure".to_string()));
            }
            self.inner.set_bucket_level(bucket_id, level)
        }

        fn all_buckets(&self) -> Result<Vec<CongestionBucket>, StoreError> {
            self.inner.all_buckets()
        }

        fn parking_live(
            &self,
            parking_id: &str,
        ) -> Result<Option<ParkingLiveRecord>, StoreError> {
            self.inner.parking_live(parking_id)
        }

        fn upsert_parking_live(&self, record: &ParkingLiveRecord) -> Result<(), StoreError> {
            self.inner.upsert_parking_live(record)
        }

        fn delete_parking_live(&self, parking_id: &str) -> Result<(), StoreError> {
            self.inner.delete_parking_live(parking_id)
        }
    }

    fn ctx() -> LogContext {
        LogContext::new("evt-test", "decay_sweep")
    }

    fn seed_bucket(fast: &dyn FastStore, id: &str, level: CongestionLevel, age_min: i64) {
        let now = Utc::now();
        fast.upsert_bucket(&CongestionBucket {
            bucket_id: id.to_string(),
            level,
            last_updated: now - Duration::minutes(age_min),
            center_lat: 1.0,
            center_lng: 103.0,
        })
        .unwrap();
    }

    #[test]
    fn test_update_bucket_advances_last_updated() {
        let durable = MemoryDurableStore::new();
        let fast = MemoryFastStore::new();
        let cfg = PipelineConfig::default();
        let t1 = Utc::now();
        let t2 = t1 + Duration::minutes(1);

        update_bucket(&durable, &fast, &NullPush, &cfg, 1.0, 103.0, CongestionLevel::Medium, t1, &ctx())
            .unwrap();
        let record = update_bucket(
            &durable, &fast, &NullPush, &cfg, 1.0, 103.0, CongestionLevel::Medium, t2, &ctx(),
        )
        .unwrap();

        assert_eq!(record.last_updated, t2);
        let stored = fast.bucket("1.000_103.000").unwrap().unwrap();
        assert_eq!(stored.last_updated, t2);
        assert_eq!(stored.center_lat, 1.0);
    }

    #[test]
    fn test_exact_staleness_boundary_not_decayed() {
        let fast = MemoryFastStore::new();
        let cfg = PipelineConfig::default();
        let now = Utc::now();
        seed_bucket(&fast, "b1", CongestionLevel::High, 30);

        let summary = decay_sweep(&fast, &cfg, now, &ctx()).unwrap();
        assert_eq!(summary.decayed, 0);
        assert_eq!(
            fast.bucket("b1").unwrap().unwrap().level,
            CongestionLevel::High
        );
    }

    #[test]
    fn test_stale_bucket_decays_exactly_one_rank() {
        let fast = MemoryFastStore::new();
        let cfg = PipelineConfig::default();
        let now = Utc::now();
        // Far beyond the window; still only one rank per sweep.
        seed_bucket(&fast, "b1", CongestionLevel::High, 300);

        decay_sweep(&fast, &cfg, now, &ctx()).unwrap();
        assert_eq!(
            fast.bucket("b1").unwrap().unwrap().level,
            CongestionLevel::Medium
        );
    }

    #[test]
    fn test_decay_cascades_across_sweeps() {
        let fast = MemoryFastStore::new();
        let cfg = PipelineConfig::default();
        let now = Utc::now();
        seed_bucket(&fast, "b1", CongestionLevel::High, 31);

        // last_updated is never bumped by decay, so every subsequent
        // sweep keeps stepping the level down.
        decay_sweep(&fast, &cfg, now, &ctx()).unwrap();
        decay_sweep(&fast, &cfg, now, &ctx()).unwrap();
        assert_eq!(
            fast.bucket("b1").unwrap().unwrap().level,
            CongestionLevel::Low
        );

        let summary = decay_sweep(&fast, &cfg, now, &ctx()).unwrap();
        assert_eq!(summary.decayed, 0);
    }

    #[test]
    fn test_sweep_survives_per_bucket_failure() {
        let fast = FlakyFastStore {
            inner: MemoryFastStore::new(),
            poison: "b1".to_string(),
            failures: Mutex::new(0),
        };
        let cfg = PipelineConfig::default();
        let now = Utc::now();
        seed_bucket(&fast, "b1", CongestionLevel::High, 40);
        seed_bucket(&fast, "b2", CongestionLevel::Medium, 40);

        let summary = decay_sweep(&fast, &cfg, now, &ctx()).unwrap();
        assert_eq!(summary.examined, 2);
        assert_eq!(summary.decayed, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(*fast.failures.lock(), 1);
        assert_eq!(
            fast.bucket("b2").unwrap().unwrap().level,
            CongestionLevel::Low
        );
    }

    #[test]
    fn test_fresh_buckets_untouched() {
        let fast = MemoryFastStore::new();
        let cfg = PipelineConfig::default();
        let now = Utc::now();
        seed_bucket(&fast, "b1", CongestionLevel::High, 5);

        let summary = decay_sweep(&fast, &cfg, now, &ctx()).unwrap();
        assert_eq!(summary.examined, 1);
        assert_eq!(summary.decayed, 0);
    }
}
