//! Notification message catalog.
//!
//! One place for every title, body, and `data.type` tag the pipeline
//! sends, so the mobile client's tap-routing contract stays in sync.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::dispatch::push::PushMessage;
use crate::storage::models::{Report, ReportStatus, ReportType};

/// `data.type` tags understood by the mobile client.
pub const DATA_TYPE_CONGESTION: &str = "congestion";
pub const DATA_TYPE_ACCIDENT: &str = "accident";
pub const DATA_TYPE_PARKING_FULL: &str = "parking_full";
pub const DATA_TYPE_STATUS_UPDATE: &str = "status_update";

lazy_static! {
    /// Per-type summary bodies for the new-report notification.
    static ref SUMMARY_BODIES: HashMap<ReportType, &'static str> = HashMap::from([
        (ReportType::IllegalParking, "Illegal parking reported nearby"),
        (ReportType::Accident, "Accident reported nearby"),
        (ReportType::Hawker, "Unlicensed vendor activity reported"),
        (ReportType::TrafficViolation, "Traffic violation reported"),
        (ReportType::RoadDamage, "Road damage reported"),
        (ReportType::Other, "New report received"),
    ]);
}

/// Fallback body for a type outside the catalog.
const SUMMARY_FALLBACK: &str = "New report received";

/// Standard heavy-traffic alert for a bucket that classified HIGH.
pub fn congestion_alert(bucket_id: &str) -> PushMessage {
    PushMessage::new(
        "Heavy Traffic Alert",
        "Heavy traffic detected in your area. Consider an alternate route.",
    )
    .with_data("type", DATA_TYPE_CONGESTION)
    .with_data("bucket_id", bucket_id)
}

/// High-priority accident alert, sent regardless of congestion level.
pub fn accident_alert(report: &Report) -> PushMessage {
    PushMessage::new(
        "Accident Nearby",
        "An accident has just been reported near you. Drive carefully.",
    )
    .with_data("type", DATA_TYPE_ACCIDENT)
    .with_data("report_id", &report.id)
}

/// Full-parking alert for a facility whose availability hit zero.
pub fn parking_full_alert(parking_id: &str, parking_name: &str) -> PushMessage {
    PushMessage::new(
        "Parking Full",
        &format!("{parking_name} has no available slots."),
    )
    .with_data("type", DATA_TYPE_PARKING_FULL)
    .with_data("parking_id", parking_id)
}

/// Summary of a new report for the operations audience, using the
/// per-type catalog with a fallback for unknown types.
pub fn report_summary(report: &Report) -> PushMessage {
    let body = report
        .parsed_type()
        .and_then(|t| SUMMARY_BODIES.get(&t).copied())
        .unwrap_or(SUMMARY_FALLBACK);
    let data_type = report
        .parsed_type()
        .map(|t| t.as_str())
        .unwrap_or(ReportType::Other.as_str());

    PushMessage::new("New Report", body)
        .with_data("type", data_type)
        .with_data("report_id", &report.id)
}

/// Status-change notice for the report's author, with a status-specific
/// prefix.
pub fn status_update(report: &Report, status: ReportStatus) -> PushMessage {
    let status_line = match status {
        ReportStatus::Resolved => "\u{2705} Resolved".to_string(),
        ReportStatus::InProgress => "\u{1f6a7} In Progress".to_string(),
        other => other.as_str().to_string(),
    };

    PushMessage::new(
        "Report Status Updated",
        &format!("Your report \"{}\" is now: {}", report.title, status_line),
    )
    .with_data("type", DATA_TYPE_STATUS_UPDATE)
    .with_data("report_id", &report.id)
}
