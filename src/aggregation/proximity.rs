//! Recency/proximity aggregation.
//!
//! Counts reports created inside the recent window that lie within the
//! configured radius of a query point, then classifies the count into a
//! congestion level. The scan is a full-window pass over the report
//! collection, not an indexed spatial query; at city-scale volumes that
//! stays comfortably inside the handler deadline.
//!
//! The count is self-inclusive: by the time the created-report handler
//! runs, the triggering report is already in the store and counts as "1
//! report now exists here".

use chrono::{DateTime, Duration, Utc};

use crate::config::PipelineConfig;
use crate::error::StoreError;
use crate::geo::haversine_meters;
use crate::logging::LogContext;
use crate::storage::models::CongestionLevel;
use crate::storage::DurableStore;

/// Count reports created within the recent window whose distance to
/// `(lat, lng)` is at most the configured radius (inclusive boundary).
pub fn count_recent_nearby(
    store: &dyn DurableStore,
    lat: f64,
    lng: f64,
    now: DateTime<Utc>,
    cfg: &PipelineConfig,
    ctx: &LogContext,
) -> Result<usize, StoreError> {
    let cutoff = now - Duration::minutes(cfg.recent_window_minutes);
    let recent = store.reports_created_since(cutoff)?;

    let count = recent
        .iter()
        .filter_map(|r| r.coordinates())
        .filter(|&(r_lat, r_lng)| {
            haversine_meters(lat, lng, r_lat, r_lng) <= cfg.proximity_radius_meters
        })
        .count();

    log::debug!(
        "{} PROXIMITY_SCAN scanned={} nearby={} radius_m={} window_min={}",
        ctx,
        recent.len(),
        count,
        cfg.proximity_radius_meters,
        cfg.recent_window_minutes
    );

    Ok(count)
}

/// Classify a nearby-report count into a congestion level.
pub fn classify(count: usize, cfg: &PipelineConfig) -> CongestionLevel {
    if count >= cfg.cluster_threshold_high {
        CongestionLevel::High
    } else if count >= cfg.cluster_threshold_medium {
        CongestionLevel::Medium
    } else {
        CongestionLevel::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::models::Report;
    use crate::storage::MemoryDurableStore;

    fn report_at(id: &str, lat: f64, lng: f64, created_at: DateTime<Utc>) -> Report {
        Report {
            id: id.to_string(),
            author_id: Some("u1".to_string()),
            report_type: Some("accident".to_string()),
            title: String::new(),
            description: String::new(),
            image_ref: Some("img".to_string()),
            latitude: Some(lat),
            longitude: Some(lng),
            status: None,
            created_at,
            validation_reasons: Vec::new(),
            validated_at: None,
        }
    }

    fn ctx() -> LogContext {
        LogContext::new("evt-test", "aggregator")
    }

    #[test]
    fn test_counts_only_recent_and_nearby() {
        let store = MemoryDurableStore::new();
        let cfg = PipelineConfig::default();
        let now = Utc::now();

        // Two recent nearby, one recent far away, one nearby but stale.
        store.insert_report(report_at("a", 1.0000, 103.0000, now));
        store.insert_report(report_at("b", 1.0010, 103.0000, now - Duration::minutes(5)));
        store.insert_report(report_at("c", 1.1000, 103.0000, now));
        store.insert_report(report_at("d", 1.0000, 103.0001, now - Duration::minutes(11)));

        let count = count_recent_nearby(&store, 1.0, 103.0, now, &cfg, &ctx()).unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_radius_boundary_is_inclusive() {
        let store = MemoryDurableStore::new();
        let mut cfg = PipelineConfig::default();
        let now = Utc::now();

        store.insert_report(report_at("a", 1.0, 103.0, now));
        let d = haversine_meters(1.0, 103.0, 1.001, 103.0);

        // Exactly at the boundary counts.
        cfg.proximity_radius_meters = d;
        store.insert_report(report_at("b", 1.001, 103.0, now));
        let count = count_recent_nearby(&store, 1.0, 103.0, now, &cfg, &ctx()).unwrap();
        assert_eq!(count, 2);

        // A radius just under the distance excludes it.
        cfg.proximity_radius_meters = d - 0.001;
        let count = count_recent_nearby(&store, 1.0, 103.0, now, &cfg, &ctx()).unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_reports_without_coordinates_skipped() {
        let store = MemoryDurableStore::new();
        let cfg = PipelineConfig::default();
        let now = Utc::now();

        let mut blank = report_at("a", 0.0, 0.0, now);
        blank.latitude = None;
        blank.longitude = None;
        store.insert_report(blank);

        let count = count_recent_nearby(&store, 1.0, 103.0, now, &cfg, &ctx()).unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_classification_thresholds() {
        let cfg = PipelineConfig::default();
        assert_eq!(classify(0, &cfg), CongestionLevel::Low);
        assert_eq!(classify(1, &cfg), CongestionLevel::Low);
        assert_eq!(classify(2, &cfg), CongestionLevel::Medium);
        assert_eq!(classify(3, &cfg), CongestionLevel::High);
        assert_eq!(classify(10, &cfg), CongestionLevel::High);
    }

    #[test]
    fn test_classification_respects_configured_thresholds() {
        let cfg = PipelineConfig {
            cluster_threshold_high: 5,
            cluster_threshold_medium: 4,
            ..PipelineConfig::default()
        };
        assert_eq!(classify(3, &cfg), CongestionLevel::Low);
        assert_eq!(classify(4, &cfg), CongestionLevel::Medium);
        assert_eq!(classify(5, &cfg), CongestionLevel::High);
    }
}
