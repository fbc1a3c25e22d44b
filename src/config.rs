//! Pipeline configuration.
//!
//! Every classification threshold and time window is a configuration
//! value, not a hardcoded business rule. Defaults match a city-scale
//! deployment; each value can be overridden through a `CIVICWATCH_*`
//! environment variable without a code change.

use std::env;
use std::str::FromStr;

/// Tunables for the congestion/alerting pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Look-back window for the recency/proximity scan, in minutes.
    pub recent_window_minutes: i64,
    /// Nearby-report count at or above which a cell is HIGH.
    pub cluster_threshold_high: usize,
    /// Nearby-report count at or above which a cell is MEDIUM.
    pub cluster_threshold_medium: usize,
    /// A bucket older than this (strictly) is decayed one rank per sweep.
    pub congestion_decay_minutes: i64,
    /// Decimal places kept when rounding coordinates into a bucket id.
    /// Three decimals is roughly a 111m grid at the equator.
    pub bucket_precision: u32,
    /// Radius of the proximity scan, in meters. Boundary is inclusive.
    pub proximity_radius_meters: f64,
    /// Interval at which the scheduler should run the decay sweep.
    pub decay_sweep_interval_minutes: i64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            recent_window_minutes: 10,
            cluster_threshold_high: 3,
            cluster_threshold_medium: 2,
            congestion_decay_minutes: 30,
            bucket_precision: 3,
            proximity_radius_meters: 400.0,
            decay_sweep_interval_minutes: 5,
        }
    }
}

impl PipelineConfig {
    /// Build a config from defaults with environment overrides applied.
    ///
    /// Unset or unparseable variables fall back to the default silently;
    /// a misconfigured deployment should degrade to known behavior, not
    /// fail to start.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            recent_window_minutes: env_or("CIVICWATCH_RECENT_WINDOW_MINUTES", d.recent_window_minutes),
            cluster_threshold_high: env_or("CIVICWATCH_CLUSTER_THRESHOLD_HIGH", d.cluster_threshold_high),
            cluster_threshold_medium: env_or(
                "CIVICWATCH_CLUSTER_THRESHOLD_MEDIUM",
                d.cluster_threshold_medium,
            ),
            congestion_decay_minutes: env_or("CIVICWATCH_DECAY_MINUTES", d.congestion_decay_minutes),
            bucket_precision: env_or("CIVICWATCH_BUCKET_PRECISION", d.bucket_precision),
            proximity_radius_meters: env_or("CIVICWATCH_RADIUS_METERS", d.proximity_radius_meters),
            decay_sweep_interval_minutes: env_or(
                "CIVICWATCH_SWEEP_INTERVAL_MINUTES",
                d.decay_sweep_interval_minutes,
            ),
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.recent_window_minutes, 10);
        assert_eq!(cfg.cluster_threshold_high, 3);
        assert_eq!(cfg.cluster_threshold_medium, 2);
        assert_eq!(cfg.congestion_decay_minutes, 30);
        assert_eq!(cfg.bucket_precision, 3);
        assert_eq!(cfg.proximity_radius_meters, 400.0);
        assert_eq!(cfg.decay_sweep_interval_minutes, 5);
    }

    #[test]
    fn test_env_or_falls_back_on_garbage() {
        std::env::set_var("CIVICWATCH_TEST_GARBAGE", "not-a-number");
        assert_eq!(env_or("CIVICWATCH_TEST_GARBAGE", 7_i64), 7);
        std::env::remove_var("CIVICWATCH_TEST_GARBAGE");
    }
}
