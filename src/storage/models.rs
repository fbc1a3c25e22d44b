//! Records held in the durable and fast stores.
//!
//! The stores are document-oriented and schemaless beyond these fields,
//! so client-written values (report type, coordinates) are modeled as
//! raw optionals and tightened by validation, never by deserialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Closed enumeration of report types. Anything else is rejected by
/// validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    IllegalParking,
    Accident,
    Hawker,
    TrafficViolation,
    RoadDamage,
    Other,
}

impl ReportType {
    /// Parse the raw string a client wrote into the document.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "illegal_parking" => Some(Self::IllegalParking),
            "accident" => Some(Self::Accident),
            "hawker" => Some(Self::Hawker),
            "traffic_violation" => Some(Self::TrafficViolation),
            "road_damage" => Some(Self::RoadDamage),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IllegalParking => "illegal_parking",
            Self::Accident => "accident",
            Self::Hawker => "hawker",
            Self::TrafficViolation => "traffic_violation",
            Self::RoadDamage => "road_damage",
            Self::Other => "other",
        }
    }
}

/// Report lifecycle status. Set exactly once by validation; afterwards
/// mutated only by external operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportStatus {
    Pending,
    InProgress,
    Resolved,
    Rejected,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Resolved => "Resolved",
            Self::Rejected => "Rejected",
        }
    }
}

/// A user-submitted observation, as written by the mobile client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    pub author_id: Option<String>,
    /// Raw type string as submitted; validated against [`ReportType`].
    pub report_type: Option<String>,
    pub title: String,
    pub description: String,
    pub image_ref: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Unset on creation; written once by validation.
    pub status: Option<ReportStatus>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation_reasons: Vec<String>,
    pub validated_at: Option<DateTime<Utc>>,
}

impl Report {
    /// Coordinates, if both are present and finite.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => Some((lat, lng)),
            _ => None,
        }
    }

    /// Parsed report type, if the raw value is in the closed enumeration.
    pub fn parsed_type(&self) -> Option<ReportType> {
        self.report_type.as_deref().and_then(ReportType::parse)
    }
}

/// Audience role for notification fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Citizen,
    TrafficPolice,
    Admin,
}

/// Externally owned user record. The core reads role and token and only
/// ever writes the token field, to prune stale entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub role: Role,
    pub push_token: Option<String>,
}

impl User {
    /// Token usable for delivery, if present and non-empty.
    pub fn deliverable_token(&self) -> Option<&str> {
        self.push_token.as_deref().filter(|t| !t.is_empty())
    }
}

/// Durable master record for a parking facility. Externally managed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParkingRecord {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub total_slots: u32,
    pub available_slots: Option<u32>,
}

/// Fast-store mirror of a durable parking record's occupancy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParkingLiveRecord {
    pub parking_id: String,
    pub available_slots: u32,
    pub total_slots: u32,
    pub last_updated: DateTime<Utc>,
}

/// Congestion severity for one geographic bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CongestionLevel {
    Low,
    Medium,
    High,
}

impl CongestionLevel {
    /// One decay step: HIGH→MEDIUM, MEDIUM→LOW, LOW stays LOW.
    pub fn step_down(&self) -> Self {
        match self {
            Self::High => Self::Medium,
            Self::Medium => Self::Low,
            Self::Low => Self::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

/// Derived per-cell congestion state, owned by the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CongestionBucket {
    pub bucket_id: String,
    pub level: CongestionLevel,
    /// Advances on every classification write; deliberately untouched by
    /// decay so stale buckets keep cooling on consecutive sweeps.
    pub last_updated: DateTime<Utc>,
    pub center_lat: f64,
    pub center_lng: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_type_round_trip() {
        for raw in [
            "illegal_parking",
            "accident",
            "hawker",
            "traffic_violation",
            "road_damage",
            "other",
        ] {
            let parsed = ReportType::parse(raw).unwrap();
            assert_eq!(parsed.as_str(), raw);
        }
        assert!(ReportType::parse("jaywalking").is_none());
        assert!(ReportType::parse("").is_none());
    }

    #[test]
    fn test_level_step_down() {
        assert_eq!(CongestionLevel::High.step_down(), CongestionLevel::Medium);
        assert_eq!(CongestionLevel::Medium.step_down(), CongestionLevel::Low);
        assert_eq!(CongestionLevel::Low.step_down(), CongestionLevel::Low);
    }

    #[test]
    fn test_coordinates_require_both_finite() {
        let mut report = Report {
            id: "r1".to_string(),
            author_id: None,
            report_type: None,
            title: String::new(),
            description: String::new(),
            image_ref: None,
            latitude: Some(1.0),
            longitude: None,
            status: None,
            created_at: Utc::now(),
            validation_reasons: Vec::new(),
            validated_at: None,
        };
        assert!(report.coordinates().is_none());

        report.longitude = Some(f64::NAN);
        assert!(report.coordinates().is_none());

        report.longitude = Some(103.8);
        assert_eq!(report.coordinates(), Some((1.0, 103.8)));
    }

    #[test]
    fn test_deliverable_token_rejects_empty() {
        let user = User {
            id: "u1".to_string(),
            role: Role::Citizen,
            push_token: Some(String::new()),
        };
        assert!(user.deliverable_token().is_none());
    }
}
