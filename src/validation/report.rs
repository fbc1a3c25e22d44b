//! Report validation.
//!
//! Runs the full field-check list against a newly created report and
//! collects every violation rather than short-circuiting, so the author
//! sees all problems at once. A rejected report is a normal terminal
//! outcome, never an error.

use crate::error::StoreError;
use crate::logging::LogContext;
use crate::storage::models::{Report, ReportType};
use crate::storage::DurableStore;

/// Outcome of validating one report.
#[derive(Debug)]
pub struct ValidationOutcome {
    pub valid: bool,
    pub reasons: Vec<String>,
}

impl ValidationOutcome {
    pub fn valid() -> Self {
        Self {
            valid: true,
            reasons: Vec::new(),
        }
    }

    pub fn invalid(reasons: Vec<String>) -> Self {
        Self {
            valid: false,
            reasons,
        }
    }
}

/// Validate a report against the durable store.
///
/// Checks, in order: author reference present; author resolves to an
/// existing user; type present and in the closed enumeration; image
/// reference present; coordinates present and numeric; coordinates in
/// valid geographic range. Only the author lookup touches the store;
/// a store failure there is transient and propagates.
pub fn validate_report(
    store: &dyn DurableStore,
    report: &Report,
    ctx: &LogContext,
) -> Result<ValidationOutcome, StoreError> {
    let mut reasons = Vec::new();

    match report.author_id.as_deref().filter(|id| !id.is_empty()) {
        None => reasons.push("missing author reference".to_string()),
        Some(author_id) => {
            if store.user(author_id)?.is_none() {
                reasons.push("author not found".to_string());
            }
        }
    }

    let known_type = report
        .report_type
        .as_deref()
        .and_then(ReportType::parse)
        .is_some();
    if !known_type {
        reasons.push("invalid type".to_string());
    }

    if report
        .image_ref
        .as_deref()
        .filter(|r| !r.is_empty())
        .is_none()
    {
        reasons.push("missing image reference".to_string());
    }

    match report.coordinates() {
        None => reasons.push("missing or non-numeric coordinates".to_string()),
        Some((lat, lng)) => {
            if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
                reasons.push("coordinates out of range".to_string());
            }
        }
    }

    if reasons.is_empty() {
        log::debug!("{} REPORT_VALID", ctx);
        Ok(ValidationOutcome::valid())
    } else {
        log::info!("{} REPORT_INVALID reasons={:?}", ctx, reasons);
        Ok(ValidationOutcome::invalid(reasons))
    }
}
